pub mod rental {
    pub mod common;
    pub mod dataset;
    pub mod error;
    pub mod record;
    pub mod window;
}
