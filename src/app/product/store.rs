//! 产品存储
//!
//! `ProductStore` 是处理器看到的唯一存储接口，当前只有内存实现，
//! 顺序即插入顺序。

use std::sync::{Mutex, MutexGuard};

use super::model::{Product, ProductDraft};
use crate::core::error::CoreError;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("product {id} not found")]
    NotFound { id: String },
    #[error("product store is unavailable")]
    Unavailable,
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id } => {
                CoreError::NotFound(format!("Product with ID {} not found.", id))
            }
            StoreError::Unavailable => CoreError::InternalServerError(err.to_string()),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// 存储层 trait
pub trait ProductStore: Send + Sync {
    /// 全量快照，按插入顺序
    fn list(&self) -> StoreResult<Vec<Product>>;

    fn find_by_id(&self, id: &str) -> StoreResult<Option<Product>>;

    /// 追加到末尾，不重复校验
    fn insert(&self, product: Product) -> StoreResult<()>;

    /// 原位覆盖字段，id 不变，返回更新后的记录
    fn replace(&self, id: &str, draft: ProductDraft) -> StoreResult<Product>;

    fn remove(&self, id: &str) -> StoreResult<()>;

    fn count(&self) -> StoreResult<usize>;
}

/// 内存存储
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    products: Mutex<Vec<Product>>,
}

impl InMemoryProductStore {
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: Mutex::new(products),
        }
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Vec<Product>>> {
        self.products.lock().map_err(|_| StoreError::Unavailable)
    }
}

impl ProductStore for InMemoryProductStore {
    fn list(&self) -> StoreResult<Vec<Product>> {
        Ok(self.lock()?.clone())
    }

    fn find_by_id(&self, id: &str) -> StoreResult<Option<Product>> {
        Ok(self.lock()?.iter().find(|p| p.id == id).cloned())
    }

    fn insert(&self, product: Product) -> StoreResult<()> {
        self.lock()?.push(product);
        Ok(())
    }

    fn replace(&self, id: &str, draft: ProductDraft) -> StoreResult<Product> {
        let mut products = self.lock()?;
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;

        draft.apply_to(product);
        Ok(product.clone())
    }

    fn remove(&self, id: &str) -> StoreResult<()> {
        let mut products = self.lock()?;
        let before = products.len();

        if let Some(index) = products.iter().position(|p| p.id == id) {
            products.remove(index);
        }

        if products.len() == before {
            return Err(StoreError::NotFound { id: id.to_string() });
        }
        Ok(())
    }

    fn count(&self) -> StoreResult<usize> {
        Ok(self.lock()?.len())
    }
}
