use crate::scene::material::Material;
use crate::scene::mesh::Mesh;

/// A mesh instance in the scene together with the material it is shaded with.
pub struct SceneObject {
    pub name: String,
    pub mesh: Mesh,
    pub material: Material,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, mesh: Mesh, material: Material) -> Self {
        Self {
            name: name.into(),
            mesh,
            material,
        }
    }
}
