//! GraphQL surface of the gateway.
//!
//! [`adapter::handle_graphql`] is the only entry point the dispatcher uses.
//! It talks to the engine through [`executor::GraphQlExecutor`], whose
//! production implementation wraps the async-graphql schema in [`schema`].

pub mod adapter;
pub mod context;
pub mod executor;
pub mod schema;

pub use adapter::handle_graphql;
pub use context::{GraphQlContext, RequestInfo};
pub use executor::{
    GraphQlExecutor, HttpGraphQlRequest, HttpGraphQlResponse, ResponseBody, SchemaExecutor,
};
pub use schema::{
    BlogSchema, CreatePostArgs, DeletePostArgs, PostObject, ResolverError, Resolvers,
    UpdatePostArgs, build_schema,
};
