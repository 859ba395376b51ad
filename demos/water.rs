//! Animated water sphere with scrolling waves, fresnel, and alpha blending.

use esfera::{DemoConfig, Material, run};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    run(DemoConfig::new("Water Sphere", Material::water()))
}
