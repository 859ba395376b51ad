//! Polished metal sphere under a single point light.

use esfera::{DemoConfig, Material, run};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    run(DemoConfig::new("Metal Sphere", Material::metal()))
}
