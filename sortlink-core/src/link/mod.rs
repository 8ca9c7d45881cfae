//! Sort-state links for column headers

pub mod builder;
pub mod state;
pub mod title;

pub use builder::{
    DirectionIndicators, LinkBuilder, LinkDescriptor, LinkSettings, SortColumn,
};
pub use state::{QueryParamNames, SortState};
pub use title::{ColumnTitle, MapContext, NoContext, TitleContext, capitalize};
