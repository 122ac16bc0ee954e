// Domain layer: core models, render settings and ports. No IO lives here.

pub mod model;
pub mod ports;
pub mod settings;
