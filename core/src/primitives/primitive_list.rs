//! Primitive List

use crate::geometry::*;
use crate::interaction::*;
use crate::light::*;
use crate::material::*;
use crate::primitive::*;
use bumpalo::Bump;

/// An aggregate that tests every primitive it holds. It is the scene's
/// top-level primitive when no acceleration structure is used.
pub struct PrimitiveList {
    /// The primitives.
    primitives: Vec<ArcPrimitive>,

    /// Union of the primitives' bounds.
    bounds: Bounds3f,
}

impl PrimitiveList {
    /// Create a new `PrimitiveList`.
    ///
    /// * `primitives` - The primitives.
    pub fn new(primitives: Vec<ArcPrimitive>) -> Self {
        let bounds = primitives
            .iter()
            .fold(Bounds3f::EMPTY, |b, p| b.union(&p.world_bound()));
        info!("PrimitiveList with {} primitives", primitives.len());
        Self { primitives, bounds }
    }

    /// Returns the number of primitives.
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    /// Returns `true` if the list holds no primitives.
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

impl Primitive for PrimitiveList {
    fn world_bound(&self) -> Bounds3f {
        self.bounds
    }

    fn intersect(&self, r: &mut Ray) -> Option<SurfaceInteraction<'_>> {
        // Each hit shortens `r.t_max`, so the last hit is the closest.
        let mut closest = None;
        for primitive in self.primitives.iter() {
            if let Some(si) = primitive.intersect(r) {
                closest = Some(si);
            }
        }
        closest
    }

    fn intersect_p(&self, r: &Ray) -> bool {
        self.primitives.iter().any(|p| p.intersect_p(r))
    }

    fn get_area_light(&self) -> Option<&ArcAreaLight> {
        error!("PrimitiveList::get_area_light() should not be called");
        None
    }

    fn get_material(&self) -> Option<&ArcMaterial> {
        error!("PrimitiveList::get_material() should not be called");
        None
    }

    fn compute_scattering_functions<'arena>(
        &self,
        _si: &SurfaceInteraction,
        _arena: &'arena Bump,
        _mode: TransportMode,
        _allow_multiple_lobes: bool,
    ) -> ScatteringFunctions<'arena> {
        error!("PrimitiveList::compute_scattering_functions() should not be called");
        ScatteringFunctions::default()
    }
}
