//! Resource and data source lifecycle traits
//!
//! Reconcilers implement [`Resource`] or [`DataSource`] over a typed model.
//! The provider registry stores them as [`DynResource`] / [`DynDataSource`],
//! which speak JSON and run schema validation before dispatching.

use crate::error::{ProviderError, Result};
use crate::schema::Schema;
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A managed resource type.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Persisted state and planned configuration share one shape.
    type Model: Serialize + DeserializeOwned + Default + Send + Sync;

    /// Registered type name, e.g. `tlspc_team`.
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    /// Cross-field checks the schema cannot express. Runs before create and
    /// update, so a failure here never reaches the API.
    fn preflight(&self, _plan: &Self::Model) -> Result<()> {
        Ok(())
    }

    async fn create(&self, plan: Self::Model) -> Result<Self::Model>;

    async fn read(&self, state: Self::Model) -> Result<Self::Model>;

    async fn update(&self, state: Self::Model, plan: Self::Model) -> Result<Self::Model>;

    async fn delete(&self, state: Self::Model) -> Result<()>;

    /// Adopt an existing object by identifier. The default seeds `id` and
    /// reads the object back.
    async fn import(&self, id: &str) -> Result<Self::Model> {
        let seed: Self::Model = serde_json::from_value(serde_json::json!({ "id": id }))?;
        self.read(seed).await
    }
}

/// A read-only lookup.
#[async_trait]
pub trait DataSource: Send + Sync {
    type Model: Serialize + DeserializeOwned + Default + Send + Sync;

    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    async fn read(&self, config: Self::Model) -> Result<Self::Model>;
}

/// JSON-facing view of a [`Resource`].
#[async_trait]
pub trait DynResource: Send + Sync {
    fn type_name(&self) -> &'static str;
    fn schema(&self) -> Schema;
    async fn create(&self, planned: Value) -> Result<Value>;
    async fn read(&self, state: Value) -> Result<Value>;
    async fn update(&self, state: Value, planned: Value) -> Result<Value>;
    async fn delete(&self, state: Value) -> Result<()>;
    async fn import(&self, id: &str) -> Result<Value>;
}

/// JSON-facing view of a [`DataSource`].
#[async_trait]
pub trait DynDataSource: Send + Sync {
    fn type_name(&self) -> &'static str;
    fn schema(&self) -> Schema;
    async fn read(&self, config: Value) -> Result<Value>;
}

fn checked<M: DeserializeOwned>(schema: &Schema, config: Value) -> Result<M> {
    let diags = schema.validate(&config);
    if !diags.is_empty() {
        return Err(ProviderError::Validation(diags));
    }
    Ok(serde_json::from_value(config)?)
}

#[async_trait]
impl<R: Resource> DynResource for R {
    fn type_name(&self) -> &'static str {
        Resource::type_name(self)
    }

    fn schema(&self) -> Schema {
        Resource::schema(self)
    }

    async fn create(&self, planned: Value) -> Result<Value> {
        let plan: R::Model = checked(&Resource::schema(self), planned)?;
        self.preflight(&plan)?;
        let state = Resource::create(self, plan).await?;
        Ok(serde_json::to_value(state)?)
    }

    async fn read(&self, state: Value) -> Result<Value> {
        let state: R::Model = serde_json::from_value(state)?;
        let state = Resource::read(self, state).await?;
        Ok(serde_json::to_value(state)?)
    }

    async fn update(&self, state: Value, planned: Value) -> Result<Value> {
        let state: R::Model = serde_json::from_value(state)?;
        let plan: R::Model = checked(&Resource::schema(self), planned)?;
        self.preflight(&plan)?;
        let state = Resource::update(self, state, plan).await?;
        Ok(serde_json::to_value(state)?)
    }

    async fn delete(&self, state: Value) -> Result<()> {
        let state: R::Model = serde_json::from_value(state)?;
        Resource::delete(self, state).await
    }

    async fn import(&self, id: &str) -> Result<Value> {
        let state = Resource::import(self, id).await?;
        Ok(serde_json::to_value(state)?)
    }
}

#[async_trait]
impl<D: DataSource> DynDataSource for D {
    fn type_name(&self) -> &'static str {
        DataSource::type_name(self)
    }

    fn schema(&self) -> Schema {
        DataSource::schema(self)
    }

    async fn read(&self, config: Value) -> Result<Value> {
        let config: D::Model = checked(&DataSource::schema(self), config)?;
        let state = DataSource::read(self, config).await?;
        Ok(serde_json::to_value(state)?)
    }
}
