use std::sync::Arc;

use async_graphql::{Context, EmptyMutation, EmptySubscription, Json, Object, SimpleObject, ID};
use pinmap_shared::models::{MapData, MapView, Pin};

use crate::assets::Assets;

// GraphQL output types

#[derive(SimpleObject)]
pub struct GqlMapView {
    pub name: String,
    pub url: String,
}

impl From<&MapView> for GqlMapView {
    fn from(v: &MapView) -> Self {
        GqlMapView {
            name: v.name.clone(),
            url: v.url.clone(),
        }
    }
}

#[derive(SimpleObject)]
pub struct GqlPin {
    pub id: ID,
    pub x: f64,
    pub y: f64,
    pub title: String,
    pub description: String,
    pub primary_icon_url: String,
    pub icon_size_x: f64,
    pub icon_size_y: f64,
    /// Gallery order, with the primary icon standing in when there are none.
    pub gallery_images: Vec<String>,
    pub additional_icons: Vec<String>,
}

impl From<&Pin> for GqlPin {
    fn from(p: &Pin) -> Self {
        GqlPin {
            id: ID(p.id.clone()),
            x: p.x,
            y: p.y,
            title: p.title.clone(),
            description: p.description.clone(),
            primary_icon_url: p.primary_icon_url.clone(),
            icon_size_x: p.icon_size_x,
            icon_size_y: p.icon_size_y,
            gallery_images: p.gallery_images(),
            additional_icons: p.additional_icons.clone(),
        }
    }
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// The whole configuration document in its on-disk shape.
    async fn map_data(&self, ctx: &Context<'_>) -> async_graphql::Result<Json<MapData>> {
        let assets = ctx.data::<Arc<Assets>>()?;
        Ok(Json(assets.map_data.clone()))
    }

    async fn map_views(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<GqlMapView>> {
        let assets = ctx.data::<Arc<Assets>>()?;
        Ok(assets.map_views().iter().map(GqlMapView::from).collect())
    }

    async fn pin(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<Option<GqlPin>> {
        let assets = ctx.data::<Arc<Assets>>()?;
        Ok(assets.find_pin(&id).map(GqlPin::from))
    }

    async fn pin_count(&self, ctx: &Context<'_>) -> async_graphql::Result<usize> {
        let assets = ctx.data::<Arc<Assets>>()?;
        Ok(assets.map_data.pins.len())
    }
}

pub type Schema = async_graphql::Schema<QueryRoot, EmptyMutation, EmptySubscription>;

pub fn build_schema(assets: Arc<Assets>) -> Schema {
    async_graphql::Schema::build(QueryRoot, EmptyMutation, EmptySubscription)
        .data(assets)
        .finish()
}
