//! 購入ボタンの表示状態
//!
//! 価格ID・在庫・価格は外部から渡される。決済APIは呼ばない。

use crate::types::Item;

/// 購入ボタンの状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuyAffordance {
    Available { price_ref: String, label: String },
    OutOfStock,
    /// 価格IDがない。ラベルは通常どおりで押せない
    NotAvailable { label: String },
}

impl BuyAffordance {
    pub fn new(price_ref: Option<&str>, stock_level: i64, price_minor: i64) -> Self {
        if stock_level <= 0 {
            return BuyAffordance::OutOfStock;
        }
        let label = format!("Buy Now — £{}", format_price(price_minor));
        match price_ref.filter(|r| !r.is_empty()) {
            Some(price_ref) => BuyAffordance::Available {
                price_ref: price_ref.to_string(),
                label,
            },
            None => BuyAffordance::NotAvailable { label },
        }
    }

    pub fn from_item(item: &Item) -> Self {
        Self::new(item.price_ref.as_deref(), item.stock_level, item.price_minor)
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, BuyAffordance::Available { .. })
    }

    pub fn label(&self) -> &str {
        match self {
            BuyAffordance::Available { label, .. } | BuyAffordance::NotAvailable { label } => label,
            BuyAffordance::OutOfStock => "Out of Stock",
        }
    }
}

/// 最小通貨単位 → "12.50"
pub fn format_price(price_minor: i64) -> String {
    let sign = if price_minor < 0 { "-" } else { "" };
    let abs = price_minor.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}
