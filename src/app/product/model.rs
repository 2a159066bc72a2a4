//! 产品数据模型

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub in_stock: bool,
}

/// 通过校验的创建/更新载荷，不含 id
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    /// 未提供时创建默认为 true，更新保持原值
    pub in_stock: Option<bool>,
}

impl ProductDraft {
    /// 用服务端生成的 id 创建新产品
    pub fn into_product(self) -> Product {
        Product {
            id: Uuid::new_v4().to_string(),
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
            in_stock: self.in_stock.unwrap_or(true),
        }
    }

    /// 覆盖到已有记录上，id 保持不变
    pub fn apply_to(self, product: &mut Product) {
        product.name = self.name;
        product.description = self.description;
        product.price = self.price;
        product.category = self.category;
        if let Some(in_stock) = self.in_stock {
            product.in_stock = in_stock;
        }
    }
}

/// 启动时预置的示例数据
pub fn sample_products() -> Vec<Product> {
    vec![
        Product {
            id: "1".to_string(),
            name: "Laptop".to_string(),
            description: "High-performance laptop with 16GB RAM".to_string(),
            price: 1200.0,
            category: "electronics".to_string(),
            in_stock: true,
        },
        Product {
            id: "2".to_string(),
            name: "Smartphone".to_string(),
            description: "Latest model with 128GB storage".to_string(),
            price: 800.0,
            category: "electronics".to_string(),
            in_stock: true,
        },
        Product {
            id: "3".to_string(),
            name: "Coffee Maker".to_string(),
            description: "Programmable coffee maker with timer".to_string(),
            price: 50.0,
            category: "kitchen".to_string(),
            in_stock: false,
        },
    ]
}
