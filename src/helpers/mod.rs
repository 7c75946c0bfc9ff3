pub mod handler_404;
pub mod pagination;
pub mod validation;
