//! Derive and attribute macros for the `inject` crate.
//!
//! This crate provides:
//! - `#[derive(Injectable)]` to build a struct from positional constructor arguments
//! - `#[inject(...)]` to declare the dependencies a struct is bound with
//!
//! Generated code references `::inject::*`.

use proc_macro::TokenStream;

mod inject;
mod injectable;

/// Derive macro implementing `Injectable`.
///
/// Each field consumes one constructor argument, in declaration order.
///
/// # Field types
///
/// - `T`: the argument is downcast and cloned (`T: Clone`)
/// - `Value`: the argument itself, identity preserved
/// - `Arc<T>`: a shared handle to the argument
/// - `Option<T>`: `None` once the arguments run out
/// - `#[injectable(base)] field: Base`: `Base` is constructed from the same
///   arguments first, the way a subclass constructor calls its parent's
///
/// # Example
///
/// ```ignore
/// use inject::Injectable;
///
/// #[derive(Injectable)]
/// struct Foo {
///     num1: i32,
/// }
///
/// #[derive(Injectable)]
/// #[injectable(name = "Bar")]
/// struct BarImpl {
///     #[injectable(base)]
///     foo: Foo,
///     num2: i32,
/// }
///
/// // Generated implementation (roughly):
/// // impl Injectable for BarImpl {
/// //     const NAME: &'static str = "Bar";
/// //     fn construct(args: &mut Args) -> Result<Self, InjectError> {
/// //         Ok(Self {
/// //             foo: <Foo as Injectable>::construct(args)?,
/// //             num2: args.take::<i32>()?,
/// //         })
/// //     }
/// // }
/// ```
#[proc_macro_derive(Injectable, attributes(injectable))]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
    injectable::derive_injectable_impl(input)
}

/// Attribute macro declaring a struct's injected dependencies.
///
/// Generates `fn binding() -> Result<Binding<Self>, InjectError>` on the
/// struct. The struct must implement `Injectable`.
///
/// # Arguments
///
/// - `named("key")`: a named placeholder
/// - `factory(Type)`: a fresh `Type`, built with no arguments at bind time
/// - `bound(Type)`: a `Type` built through `Type::binding()`
/// - `extends = Type`: inherit the dependencies of `Type::binding()`
/// - `strict`: enable strict argument checking
/// - any other expression: passed through as a value
///
/// # Example
///
/// ```ignore
/// #[inject(extends = Foo, 2, named("$http"), bound(Client))]
/// #[derive(Injectable)]
/// struct Api {
///     #[injectable(base)]
///     foo: Foo,
///     retries: i32,
///     http: Value,
///     client: Client,
/// }
///
/// let api = Api::binding()?.instantiate_injected(vec![http])?;
/// ```
#[proc_macro_attribute]
pub fn inject(args: TokenStream, item: TokenStream) -> TokenStream {
    inject::inject_impl(args, item)
}
