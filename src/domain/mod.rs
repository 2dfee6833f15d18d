// Domain layer: stations, sections and the ports the line service talks through.

pub mod model;
pub mod ports;
