pub mod errors {
    pub mod error_types;
}

pub mod config {
    pub mod settings;
}

pub mod geolocation {
    pub mod locator;
}

pub mod map {
    pub mod controller;
    pub mod headless;
    pub mod point;
    pub mod point_source;
    pub mod widget;
}

pub mod ui {
    pub mod app;
    pub mod fonts;
    pub mod markers;
    pub mod provider;
    pub mod surface;
    pub mod windows;
}
