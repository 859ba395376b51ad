//! Diffuse clay-like sphere with a heavy ambient term.

use esfera::{DemoConfig, Material, run};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    run(DemoConfig::new("Matte Sphere", Material::matte()))
}
