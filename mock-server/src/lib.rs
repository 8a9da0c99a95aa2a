//! In-memory catalog REST API speaking the envelope protocol.
//!
//! Every resource gets the same five endpoints:
//! `GET /{route}` → `{ "<list>": [...] }`, `GET /{route}/{id}` →
//! `{ "<single>": {...} }`, `POST /{route}` (201), `PUT /{route}` with the id
//! in the body, and `DELETE /{route}/{id}` (204).

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

/// A resource row the server can store.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    const ROUTE: &'static str;
    const SINGLE: &'static str;
    const LIST: &'static str;

    fn id(&self) -> i32;
    fn set_id(&mut self, id: i32);
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    #[serde(default)]
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub picture_uri: Option<String>,
    pub catalog_type_id: i32,
    pub catalog_brand_id: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogBrand {
    #[serde(default)]
    pub id: i32,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogType {
    #[serde(default)]
    pub id: i32,
    pub name: String,
}

macro_rules! record {
    ($ty:ty, $route:literal, $single:literal, $list:literal) => {
        impl Record for $ty {
            const ROUTE: &'static str = $route;
            const SINGLE: &'static str = $single;
            const LIST: &'static str = $list;

            fn id(&self) -> i32 {
                self.id
            }

            fn set_id(&mut self, id: i32) {
                self.id = id;
            }
        }
    };
}

record!(CatalogItem, "catalog-items", "catalogItem", "catalogItems");
record!(CatalogBrand, "catalog-brands", "catalogBrand", "catalogBrands");
record!(CatalogType, "catalog-types", "catalogType", "catalogTypes");

/// Rows of one resource, ordered by id.
#[derive(Debug)]
pub struct Table<R> {
    rows: BTreeMap<i32, R>,
    next_id: i32,
}

impl<R: Record> Table<R> {
    pub fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Insert with a freshly assigned id, ignoring any id already set.
    pub fn insert(&mut self, mut row: R) -> R {
        row.set_id(self.next_id);
        self.next_id += 1;
        self.rows.insert(row.id(), row.clone());
        row
    }
}

impl<R: Record> Default for Table<R> {
    fn default() -> Self {
        Self::new()
    }
}

pub type Db<R> = Arc<RwLock<Table<R>>>;

/// Initial contents of the three resources.
#[derive(Debug, Default)]
pub struct Catalog {
    pub items: Table<CatalogItem>,
    pub brands: Table<CatalogBrand>,
    pub types: Table<CatalogType>,
}

impl Catalog {
    /// A small storefront: five brands, four types, a handful of items.
    pub fn seeded() -> Self {
        let mut catalog = Self::default();
        for name in ["Azure", ".NET", "Visual Studio", "SQL Server", "Other"] {
            catalog.brands.insert(CatalogBrand {
                id: 0,
                name: name.to_string(),
            });
        }
        for name in ["Mug", "T-Shirt", "Sheet", "USB Memory Stick"] {
            catalog.types.insert(CatalogType {
                id: 0,
                name: name.to_string(),
            });
        }
        for (type_id, brand_id, name, price) in [
            (2, 2, ".NET Bot Black Sweatshirt", 19.5),
            (1, 2, ".NET Black & White Mug", 8.5),
            (2, 5, "Prism White T-Shirt", 12.0),
            (2, 2, ".NET Foundation Sweatshirt", 12.0),
            (3, 5, "Roslyn Red Sheet", 8.5),
            (2, 2, ".NET Blue Sweatshirt", 12.0),
        ] {
            catalog.items.insert(CatalogItem {
                id: 0,
                name: name.to_string(),
                description: name.to_string(),
                price,
                picture_uri: None,
                catalog_type_id: type_id,
                catalog_brand_id: brand_id,
            });
        }
        catalog
    }
}

pub fn app() -> Router {
    router(Catalog::default())
}

pub fn router(catalog: Catalog) -> Router {
    Router::new()
        .merge(resource(catalog.items))
        .merge(resource(catalog.brands))
        .merge(resource(catalog.types))
}

pub async fn run_with(listener: TcpListener, catalog: Catalog) -> Result<(), std::io::Error> {
    axum::serve(listener, router(catalog)).await
}

fn resource<R: Record>(table: Table<R>) -> Router {
    let db: Db<R> = Arc::new(RwLock::new(table));
    Router::new()
        .route(
            &format!("/{}", R::ROUTE),
            get(list_rows::<R>).post(create_row::<R>).put(update_row::<R>),
        )
        .route(
            &format!("/{}/{{id}}", R::ROUTE),
            get(get_row::<R>).delete(delete_row::<R>),
        )
        .with_state(db)
}

fn envelope(key: &str, value: Value) -> Json<Value> {
    let mut object = Map::new();
    object.insert(key.to_string(), value);
    Json(Value::Object(object))
}

fn single<R: Record>(row: &R) -> Json<Value> {
    envelope(R::SINGLE, serde_json::to_value(row).unwrap_or(Value::Null))
}

async fn list_rows<R: Record>(State(db): State<Db<R>>) -> Json<Value> {
    let table = db.read().await;
    let rows: Vec<Value> = table
        .rows
        .values()
        .filter_map(|row| serde_json::to_value(row).ok())
        .collect();
    envelope(R::LIST, Value::Array(rows))
}

async fn get_row<R: Record>(
    State(db): State<Db<R>>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, StatusCode> {
    let table = db.read().await;
    table.rows.get(&id).map(single).ok_or(StatusCode::NOT_FOUND)
}

async fn create_row<R: Record>(
    State(db): State<Db<R>>,
    Json(input): Json<R>,
) -> (StatusCode, Json<Value>) {
    let created = db.write().await.insert(input);
    debug!(route = R::ROUTE, id = created.id(), "created row");
    (StatusCode::CREATED, single(&created))
}

async fn update_row<R: Record>(
    State(db): State<Db<R>>,
    Json(input): Json<R>,
) -> Result<Json<Value>, StatusCode> {
    let mut table = db.write().await;
    let row = table.rows.get_mut(&input.id()).ok_or(StatusCode::NOT_FOUND)?;
    *row = input;
    Ok(single(&*row))
}

async fn delete_row<R: Record>(
    State(db): State<Db<R>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, StatusCode> {
    let mut table = db.write().await;
    table
        .rows
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}
