pub mod copy;
pub mod logger;
pub mod materialize;

#[derive(Clone)]
pub struct MaterializeOptions {
    pub preserve_times: bool,
    pub dry_run: bool,
}

impl Default for MaterializeOptions {
    fn default() -> Self {
        Self {
            preserve_times: true,
            dry_run: false,
        }
    }
}
