pub mod product;
pub mod pricing;
pub mod inventory;
pub mod money;
pub mod patch;

pub use product::{BulkPriceRule, Product, ProductId, ProductKind, Variant, VariantId};
pub use pricing::{BulkQuote, DiscountSchedule, DiscountTier, PricingError};
pub use inventory::{InventorySnapshot, StockLevel, StockStatus, LOW_STOCK_THRESHOLD};
pub use patch::{PatchError, VariantPatch};
