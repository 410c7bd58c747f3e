pub mod controller;
pub mod debounce;
pub mod local;
pub mod state;

pub use controller::SearchController;
pub use debounce::Debouncer;
pub use state::{
    DisplayState, ModalState, Notice, NoticeKind, QuickFilter, SearchFilters, SearchForm,
    SearchState,
};
