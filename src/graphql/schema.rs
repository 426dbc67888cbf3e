//! Blog schema: `Post`, the `Query` and `Mutation` roots, and the resolver
//! logic behind them.
//!
//! Resolver logic lives on [`Resolvers`] and takes typed argument structs, so
//! it can be exercised without going through the GraphQL engine. The
//! `QueryRoot` / `MutationRoot` objects only translate between the two.

use super::context::GraphQlContext;
use crate::store::{NewPost, Post, PostPatch, PostStore, StoreError};
use crate::trophy::{TrophyError, TrophyService};
use async_graphql::{
    Context, EmptySubscription, ErrorExtensions, ID, Object, Schema, SimpleObject,
};
use axum::http::header::USER_AGENT;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

pub type BlogSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

#[derive(Debug, Clone, PartialEq, Eq, SimpleObject)]
#[graphql(name = "Post")]
pub struct PostObject {
    pub id: ID,
    pub title: String,
    pub content: String,
    pub author: Option<String>,
    #[graphql(name = "publish_date")]
    pub publish_date: Option<String>,
}

impl From<Post> for PostObject {
    fn from(post: Post) -> Self {
        Self {
            id: ID(post.id),
            title: post.title,
            content: post.content,
            author: post.author,
            publish_date: post.publish_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePostArgs {
    pub title: String,
    pub content: String,
    pub author: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePostArgs {
    pub id: String,
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePostArgs {
    pub id: String,
}

#[derive(Debug, Error)]
pub enum ResolverError {
    #[error("Authentication required to {0} posts")]
    AuthenticationRequired(&'static str),

    #[error("Failed to update post")]
    UpdateFailed(#[source] StoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Trophy(#[from] TrophyError),
}

impl ResolverError {
    fn into_graphql(self) -> async_graphql::Error {
        let code = match &self {
            ResolverError::AuthenticationRequired(_) => "UNAUTHENTICATED",
            _ => "INTERNAL_SERVER_ERROR",
        };
        async_graphql::Error::new(self.to_string()).extend_with(|_, ext| ext.set("code", code))
    }
}

/// Shared resolver state, registered once as schema data.
#[derive(Clone)]
pub struct Resolvers {
    store: Arc<dyn PostStore>,
    trophies: Arc<dyn TrophyService>,
}

impl Resolvers {
    pub fn new(store: Arc<dyn PostStore>, trophies: Arc<dyn TrophyService>) -> Self {
        Self { store, trophies }
    }

    pub async fn posts(&self) -> Result<Vec<Post>, ResolverError> {
        Ok(self.store.list_posts().await?)
    }

    pub async fn post(&self, id: &str) -> Result<Post, ResolverError> {
        Ok(self.store.get_post(id).await?)
    }

    pub async fn trophies(&self, username: &str) -> Result<String, ResolverError> {
        Ok(self.trophies.fetch(username).await?)
    }

    pub async fn create_post(
        &self,
        auth_token: Option<&str>,
        args: CreatePostArgs,
    ) -> Result<Post, ResolverError> {
        let token = auth_token.ok_or(ResolverError::AuthenticationRequired("create"))?;
        let post = NewPost {
            title: args.title,
            content: args.content,
            author: args.author,
        };
        Ok(self.store.create_post(post, token).await?)
    }

    pub async fn update_post(
        &self,
        auth_token: Option<&str>,
        args: UpdatePostArgs,
    ) -> Result<Post, ResolverError> {
        let token = auth_token.ok_or(ResolverError::AuthenticationRequired("update"))?;
        info!(id = %args.id, "updating post");
        let patch = PostPatch {
            title: args.title,
            content: args.content,
            author: args.author,
        };
        let result = if patch.is_empty() {
            Err(StoreError::EmptyPatch)
        } else {
            self.store.update_post(&args.id, patch, token).await
        };
        match result {
            Ok(post) => {
                info!(id = %post.id, "update successful");
                Ok(post)
            }
            Err(err) => {
                error!(id = %args.id, error = %err, "error updating post");
                Err(ResolverError::UpdateFailed(err))
            }
        }
    }

    pub async fn delete_post(
        &self,
        auth_token: Option<&str>,
        args: DeletePostArgs,
    ) -> Result<Post, ResolverError> {
        let token = auth_token.ok_or(ResolverError::AuthenticationRequired("delete"))?;
        Ok(self.store.delete_post(&args.id, token).await?)
    }
}

fn resolvers<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a Resolvers> {
    ctx.data::<Resolvers>()
}

fn auth_token<'a>(ctx: &Context<'a>) -> Option<&'a str> {
    let context = ctx.data_opt::<GraphQlContext>()?;
    if !context.is_authenticated() {
        let request = context.request();
        let user_agent = request
            .headers
            .get(USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("-");
        warn!(
            method = %request.method,
            path = %request.path,
            user_agent,
            "mutation without bearer token"
        );
    }
    context.auth_token()
}

#[derive(Debug, Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn posts(
        &self,
        ctx: &Context<'_>,
    ) -> async_graphql::Result<Option<Vec<Option<PostObject>>>> {
        let posts = resolvers(ctx)?
            .posts()
            .await
            .map_err(ResolverError::into_graphql)?;
        Ok(Some(posts.into_iter().map(|post| Some(post.into())).collect()))
    }

    async fn post(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<Option<PostObject>> {
        let post = resolvers(ctx)?
            .post(id.as_str())
            .await
            .map_err(ResolverError::into_graphql)?;
        Ok(Some(post.into()))
    }

    async fn trophies(
        &self,
        ctx: &Context<'_>,
        username: String,
    ) -> async_graphql::Result<Option<String>> {
        let markup = resolvers(ctx)?
            .trophies(&username)
            .await
            .map_err(ResolverError::into_graphql)?;
        Ok(Some(markup))
    }
}

#[derive(Debug, Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_post(
        &self,
        ctx: &Context<'_>,
        title: String,
        content: String,
        author: Option<String>,
    ) -> async_graphql::Result<Option<PostObject>> {
        let args = CreatePostArgs {
            title,
            content,
            author,
        };
        let post = resolvers(ctx)?
            .create_post(auth_token(ctx), args)
            .await
            .map_err(ResolverError::into_graphql)?;
        Ok(Some(post.into()))
    }

    async fn update_post(
        &self,
        ctx: &Context<'_>,
        id: ID,
        title: Option<String>,
        content: Option<String>,
        author: Option<String>,
    ) -> async_graphql::Result<Option<PostObject>> {
        let args = UpdatePostArgs {
            id: id.0,
            title,
            content,
            author,
        };
        let post = resolvers(ctx)?
            .update_post(auth_token(ctx), args)
            .await
            .map_err(ResolverError::into_graphql)?;
        Ok(Some(post.into()))
    }

    async fn delete_post(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> async_graphql::Result<Option<PostObject>> {
        let post = resolvers(ctx)?
            .delete_post(auth_token(ctx), DeletePostArgs { id: id.0 })
            .await
            .map_err(ResolverError::into_graphql)?;
        Ok(Some(post.into()))
    }
}

pub fn build_schema(resolvers: Resolvers) -> BlogSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(resolvers)
        .finish()
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod schema_test;
