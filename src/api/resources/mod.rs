//! Resources of the framework package.

mod app;
mod configs;
mod icons;
mod root;

use std::sync::Arc;

pub use app::{App, script_urls};
pub use configs::{Strings, Themes, parse_fields};
pub use icons::Icons;
pub use root::Root;

use crate::routing::{APP_ROOT, Resource, Route};

/// Routes declared by the mxxn package.
pub fn routes() -> Vec<Route> {
    let themes: Arc<dyn Resource> = Arc::new(Themes);
    let strings: Arc<dyn Resource> = Arc::new(Strings);

    vec![
        Route::new(APP_ROOT, Root),
        Route::new("/", App),
        Route::shared("/mxxn/themes", themes.clone()),
        Route::shared("/mxxn/themes/{id}", themes).with_suffix(configs::ITEM),
        Route::shared("/mxxn/strings", strings.clone()),
        Route::shared("/mxxn/strings/{locale}", strings).with_suffix(configs::ITEM),
        Route::new("/mxxn/icons/{name}", Icons),
    ]
}
