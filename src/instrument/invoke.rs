//! Calling a wrapped function with an argument tuple
//!
//! [`Invoke`] lets one wrapper type accept functions of any arity from zero
//! to six: the arguments travel as a tuple and are spread back out in the
//! same order.

/// A function callable with the argument tuple `Args`
///
/// ```
/// use instrumented_log::instrument::Invoke;
///
/// fn divide(a: i32, b: i32) -> i32 {
///     a / b
/// }
///
/// assert_eq!(divide.invoke((4, 2)), 2);
/// assert_eq!((|| "ready").invoke(()), "ready");
/// ```
pub trait Invoke<Args> {
    type Output;

    fn invoke(&self, args: Args) -> Self::Output;
}

macro_rules! impl_invoke {
    ($($arg:ident),*) => {
        impl<Func, Out, $($arg),*> Invoke<($($arg,)*)> for Func
        where
            Func: Fn($($arg),*) -> Out,
        {
            type Output = Out;

            #[allow(non_snake_case)]
            #[inline]
            fn invoke(&self, ($($arg,)*): ($($arg,)*)) -> Out {
                (self)($($arg),*)
            }
        }
    };
}

impl_invoke!();
impl_invoke!(A);
impl_invoke!(A, B);
impl_invoke!(A, B, C);
impl_invoke!(A, B, C, D);
impl_invoke!(A, B, C, D, E);
impl_invoke!(A, B, C, D, E, G);
