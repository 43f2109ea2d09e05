pub mod analysis;
pub mod column;
pub mod mapping;
pub mod money;

pub use analysis::{DateOrder, Field, FileAnalysis, ProbedDialect, Suggestions};
pub use column::ColumnIndex;
pub use mapping::{AmountColumns, ColumnMapping, MappingError};
pub use money::Money;
