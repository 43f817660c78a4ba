//! Geometric Primitives

use crate::geometry::*;
use crate::interaction::*;
use crate::light::*;
use crate::material::*;
use crate::medium::*;
use crate::primitive::*;
use crate::shape::*;
use bumpalo::Bump;

/// GeometricPrimitive represents a single shape in a scene.
#[derive(Clone)]
pub struct GeometricPrimitive {
    /// The shape.
    pub shape: ArcShape,

    /// The material. `None` marks a medium boundary.
    pub material: Option<ArcMaterial>,

    /// Optional area light that describes emmission characterisitics if it
    /// emits light.
    pub area_light: Option<ArcAreaLight>,

    /// Information about the participating media on the inside and outside
    /// the primitive.
    pub medium_interface: MediumInterface,
}

impl GeometricPrimitive {
    /// Create a new geometric primitive.
    ///
    /// * `shape`            - The shape.
    /// * `material`         - The material.
    /// * `area_light`       - Optional area light that describes emmission
    ///                        characterisitics if it emits light.
    /// * `medium_interface` - Information about the participating media on the
    ///                        inside and outside the primitive.
    pub fn new(
        shape: ArcShape,
        material: Option<ArcMaterial>,
        area_light: Option<ArcAreaLight>,
        medium_interface: MediumInterface,
    ) -> Self {
        Self {
            shape,
            material,
            area_light,
            medium_interface,
        }
    }
}

impl Primitive for GeometricPrimitive {
    fn world_bound(&self) -> Bounds3f {
        self.shape.world_bound()
    }

    fn intersect(&self, r: &mut Ray) -> Option<SurfaceInteraction<'_>> {
        let Intersection { t, isect } = self.shape.intersect(r)?;
        r.t_max = t;

        let mut si: SurfaceInteraction<'_> = isect;
        si.primitive = Some(self);

        // Media on either side of the surface; a non-transition surface
        // inherits the medium the ray travels through.
        si.hit.medium_interface = if self.medium_interface.is_medium_transition() {
            Some(self.medium_interface.clone())
        } else {
            r.medium.clone().map(|m| MediumInterface::from(Some(m)))
        };

        Some(si)
    }

    fn intersect_p(&self, r: &Ray) -> bool {
        self.shape.intersect_p(r)
    }

    fn get_area_light(&self) -> Option<&ArcAreaLight> {
        self.area_light.as_ref()
    }

    fn get_material(&self) -> Option<&ArcMaterial> {
        self.material.as_ref()
    }

    fn compute_scattering_functions<'arena>(
        &self,
        si: &SurfaceInteraction,
        arena: &'arena Bump,
        mode: TransportMode,
        allow_multiple_lobes: bool,
    ) -> ScatteringFunctions<'arena> {
        match self.material.as_ref() {
            Some(material) => material.compute_scattering_functions(si, arena, mode, allow_multiple_lobes),
            None => ScatteringFunctions::default(),
        }
    }
}
