//! Terms and their applicative composition.
//!
//! A [`Term`] pairs the argument descriptors it needs with a deferred
//! computation over the parsed command line. Terms are immutable and can be
//! evaluated any number of times.
//!
//! ```
//! use cmdterm_core::arg::{flag, opt, ArgInfo};
//! use cmdterm_core::conv::int;
//! use cmdterm_core::term::{app, Term};
//!
//! let verbose = flag(ArgInfo::new(&["v", "verbose"]));
//! let count = opt(int(), 1, ArgInfo::new(&["n", "count"]));
//! let both = app(verbose.map(|v| move |n: i64| (v, n)), count);
//! assert_eq!(both.descriptors().len(), 2);
//! ```

use std::rc::Rc;

use crate::arg::ArgInfo;
use crate::cmdline::CmdLine;
use crate::context::EvalContext;
use crate::error::Result;

type EvalFn<A> = dyn Fn(&EvalContext, &CmdLine) -> Result<A>;

pub struct Term<A> {
    descriptors: Vec<ArgInfo>,
    eval: Rc<EvalFn<A>>,
}

impl<A> Clone for Term<A> {
    fn clone(&self) -> Self {
        Self {
            descriptors: self.descriptors.clone(),
            eval: Rc::clone(&self.eval),
        }
    }
}

impl<A: 'static> Term<A> {
    /// A term declaring `descriptors` and computing its value with `eval`.
    ///
    /// `eval` must only consult the descriptors it declares.
    pub fn new(
        descriptors: Vec<ArgInfo>,
        eval: impl Fn(&EvalContext, &CmdLine) -> Result<A> + 'static,
    ) -> Self {
        Self {
            descriptors,
            eval: Rc::new(eval),
        }
    }

    /// A term with no descriptors that always yields `value`.
    pub fn pure(value: A) -> Self
    where
        A: Clone,
    {
        Self::new(Vec::new(), move |_, _| Ok(value.clone()))
    }

    #[must_use]
    pub fn descriptors(&self) -> &[ArgInfo] {
        &self.descriptors
    }

    /// Runs the term's computation.
    ///
    /// # Errors
    ///
    /// Returns whatever failure the computation produces.
    pub fn eval(&self, ctx: &EvalContext, line: &CmdLine) -> Result<A> {
        (self.eval)(ctx, line)
    }

    /// Transforms the success value; descriptors and failures are unchanged.
    #[must_use]
    pub fn map<B: 'static>(self, f: impl Fn(A) -> B + 'static) -> Term<B> {
        let eval = self.eval;
        Term::new(self.descriptors, move |ctx, line| eval(ctx, line).map(&f))
    }

    /// Like [`Term::map`] but `f` may fail, e.g. with a [`Failure::Message`].
    ///
    /// [`Failure::Message`]: crate::error::Failure::Message
    #[must_use]
    pub fn try_map<B: 'static>(self, f: impl Fn(A) -> Result<B> + 'static) -> Term<B> {
        let eval = self.eval;
        Term::new(self.descriptors, move |ctx, line| eval(ctx, line).and_then(&f))
    }

    /// Pairs two terms, left evaluated first.
    #[must_use]
    pub fn zip<B: 'static>(self, other: Term<B>) -> Term<(A, B)> {
        map2(self, other, |a, b| (a, b))
    }
}

impl<A: 'static> Term<Result<A>> {
    /// Lets a term's computation decide the outcome itself, e.g. to report
    /// an error message or to request help.
    #[must_use]
    pub fn ret(self) -> Term<A> {
        self.try_map(|result| result)
    }
}

/// Applies the function computed by `f` to the value computed by `x`.
///
/// Descriptors are `f`'s followed by `x`'s. `f` is evaluated first; its
/// failure wins over any failure of `x`.
#[must_use]
pub fn app<X, Y, F>(f: Term<F>, x: Term<X>) -> Term<Y>
where
    X: 'static,
    Y: 'static,
    F: FnOnce(X) -> Y + 'static,
{
    let mut descriptors = f.descriptors;
    descriptors.extend(x.descriptors);
    let (eval_f, eval_x) = (f.eval, x.eval);

    Term::new(descriptors, move |ctx, line| {
        let function = eval_f(ctx, line)?;
        let value = eval_x(ctx, line)?;
        Ok(function(value))
    })
}

/// Combines two terms with a binary function.
#[must_use]
pub fn map2<A, B, C>(a: Term<A>, b: Term<B>, f: impl Fn(A, B) -> C + 'static) -> Term<C>
where
    A: 'static,
    B: 'static,
    C: 'static,
{
    let f = Rc::new(f);
    app(
        a.map(move |first| {
            let f = Rc::clone(&f);
            move |second| f(first, second)
        }),
        b,
    )
}

/// Combines three terms with a ternary function.
#[must_use]
pub fn map3<A, B, C, D>(
    a: Term<A>,
    b: Term<B>,
    c: Term<C>,
    f: impl Fn(A, B, C) -> D + 'static,
) -> Term<D>
where
    A: 'static,
    B: 'static,
    C: 'static,
    D: 'static,
{
    let f = Rc::new(f);
    app(
        map2(a, b, move |first, second| {
            let f = Rc::clone(&f);
            move |third| f(first, second, third)
        }),
        c,
    )
}

/// The names of the sibling sub-commands of the evaluated command.
#[must_use]
pub fn choice_names() -> Term<Vec<String>> {
    Term::new(Vec::new(), |ctx, _| {
        Ok(ctx
            .choices()
            .iter()
            .map(|choice| choice.name().to_string())
            .collect())
    })
}

/// The name of the program's main command.
#[must_use]
pub fn main_name() -> Term<String> {
    Term::new(Vec::new(), |ctx, _| Ok(ctx.main_command().name().to_string()))
}
