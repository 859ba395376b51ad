//! Surface material descriptors for the sphere demos.
//!
//! The three demo applications share one mesh type and differ only in how
//! the surface is shaded. That difference is captured by [`Material`], a
//! tagged union dispatched at draw time: each variant selects its own WGSL
//! pipeline and lowers its parameters into one shared
//! [`MaterialUniforms`] block.

use glam::Vec3;

/// Discriminant used to pick the render pipeline for a material.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaterialKind {
    Metal,
    Matte,
    Water,
}

/// How a sphere's surface is shaded.
#[derive(Clone, Copy, Debug)]
pub enum Material {
    /// Shiny Blinn-Phong-style surface dominated by its specular highlight.
    Metal {
        color: Vec3,
        shininess: f32,
        specular_strength: f32,
    },
    /// Ambient + diffuse only, no highlight at all.
    Matte { color: Vec3 },
    /// Animated water: UV-space waves distort the normal, a fresnel rim
    /// brightens grazing angles, and the surface is alpha blended. Consumes
    /// the frame's elapsed-time uniform.
    Water { color: Vec3, transparency: f32 },
}

impl Material {
    /// Silvery metal with a tight, strong highlight.
    pub fn metal() -> Self {
        Material::Metal {
            color: Vec3::new(0.7, 0.7, 0.8),
            shininess: 256.0,
            specular_strength: 1.2,
        }
    }

    /// Flat brown clay.
    pub fn matte() -> Self {
        Material::Matte {
            color: Vec3::new(0.6, 0.3, 0.1),
        }
    }

    /// Semi-transparent animated water.
    pub fn water() -> Self {
        Material::Water {
            color: Vec3::new(0.2, 0.4, 0.8),
            transparency: 0.7,
        }
    }

    pub fn kind(&self) -> MaterialKind {
        match self {
            Material::Metal { .. } => MaterialKind::Metal,
            Material::Matte { .. } => MaterialKind::Matte,
            Material::Water { .. } => MaterialKind::Water,
        }
    }

    /// True for materials that need alpha blending.
    pub fn is_transparent(&self) -> bool {
        matches!(self, Material::Water { .. })
    }

    /// Background clear color each demo pairs with its material.
    pub fn clear_color(&self) -> wgpu::Color {
        match self {
            Material::Metal { .. } => wgpu::Color {
                r: 0.05,
                g: 0.05,
                b: 0.1,
                a: 1.0,
            },
            Material::Matte { .. } => wgpu::Color {
                r: 0.3,
                g: 0.3,
                b: 0.35,
                a: 1.0,
            },
            Material::Water { .. } => wgpu::Color {
                r: 0.1,
                g: 0.2,
                b: 0.3,
                a: 1.0,
            },
        }
    }

    /// Light position each demo places its single point light at.
    pub fn light_position(&self) -> Vec3 {
        match self {
            Material::Water { .. } => Vec3::new(2.0, 5.0, 3.0),
            _ => Vec3::new(3.0, 5.0, 3.0),
        }
    }

    /// Lowers the variant into the shared uniform block.
    pub fn uniforms(&self) -> MaterialUniforms {
        match *self {
            Material::Metal {
                color,
                shininess,
                specular_strength,
            } => MaterialUniforms {
                color: [color.x, color.y, color.z, 1.0],
                params: [shininess, specular_strength, 1.0, 0.0],
            },
            Material::Matte { color } => MaterialUniforms {
                color: [color.x, color.y, color.z, 1.0],
                params: [0.0, 0.0, 1.0, 0.0],
            },
            Material::Water {
                color,
                transparency,
            } => MaterialUniforms {
                color: [color.x, color.y, color.z, 1.0],
                params: [0.0, 0.0, transparency, 0.0],
            },
        }
    }
}

/// GPU-side material parameters, shared by all three pipelines.
///
/// `params` packs `[shininess, specular_strength, transparency, 0]`; each
/// shader reads the lanes it cares about.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniforms {
    pub color: [f32; 4],
    pub params: [f32; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_demo_constants() {
        let Material::Metal {
            color,
            shininess,
            specular_strength,
        } = Material::metal()
        else {
            panic!("wrong variant");
        };
        assert_eq!(color, Vec3::new(0.7, 0.7, 0.8));
        assert_eq!(shininess, 256.0);
        assert_eq!(specular_strength, 1.2);

        assert_eq!(Material::matte().kind(), MaterialKind::Matte);
        assert_eq!(Material::water().kind(), MaterialKind::Water);
    }

    #[test]
    fn only_water_blends() {
        assert!(!Material::metal().is_transparent());
        assert!(!Material::matte().is_transparent());
        assert!(Material::water().is_transparent());
    }

    #[test]
    fn uniform_lowering_packs_params() {
        let u = Material::metal().uniforms();
        assert_eq!(u.params[0], 256.0);
        assert_eq!(u.params[1], 1.2);

        let u = Material::water().uniforms();
        assert_eq!(u.color, [0.2, 0.4, 0.8, 1.0]);
        assert_eq!(u.params[2], 0.7);

        let u = Material::matte().uniforms();
        assert_eq!(u.params, [0.0, 0.0, 1.0, 0.0]);
    }
}
