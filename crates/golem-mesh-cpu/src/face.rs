use golem_geom::Vec3;

/// The six cube face directions, in emission order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Face {
    PosX = 0,
    NegX = 1,
    PosY = 2,
    NegY = 3,
    PosZ = 4,
    NegZ = 5,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::PosX,
        Face::NegX,
        Face::PosY,
        Face::NegY,
        Face::PosZ,
        Face::NegZ,
    ];

    /// Returns the `[0..6)` index of this face.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the unit-normal vector for this face.
    #[inline]
    pub fn normal(self) -> Vec3 {
        match self {
            Face::PosX => Vec3::new(1.0, 0.0, 0.0),
            Face::NegX => Vec3::new(-1.0, 0.0, 0.0),
            Face::PosY => Vec3::new(0.0, 1.0, 0.0),
            Face::NegY => Vec3::new(0.0, -1.0, 0.0),
            Face::PosZ => Vec3::new(0.0, 0.0, 1.0),
            Face::NegZ => Vec3::new(0.0, 0.0, -1.0),
        }
    }

    /// In-face tangent axis. Tangent/bitangent pairs are fixed per face so
    /// quad winding stays consistent with the normal.
    #[inline]
    pub fn tangent(self) -> Vec3 {
        match self {
            Face::PosX => Vec3::new(0.0, 1.0, 0.0),
            Face::NegX => Vec3::new(0.0, -1.0, 0.0),
            Face::PosY => Vec3::new(0.0, 0.0, 1.0),
            Face::NegY => Vec3::new(0.0, 0.0, -1.0),
            Face::PosZ => Vec3::new(1.0, 0.0, 0.0),
            Face::NegZ => Vec3::new(-1.0, 0.0, 0.0),
        }
    }

    /// In-face bitangent axis, completing the tangent frame.
    #[inline]
    pub fn bitangent(self) -> Vec3 {
        match self {
            Face::PosX | Face::NegX => Vec3::new(0.0, 0.0, 1.0),
            Face::PosY | Face::NegY => Vec3::new(1.0, 0.0, 0.0),
            Face::PosZ | Face::NegZ => Vec3::new(0.0, 1.0, 0.0),
        }
    }

    /// Returns the integer grid delta `(dx,dy,dz)` when stepping out of this face.
    #[inline]
    pub fn delta(self) -> (i32, i32, i32) {
        match self {
            Face::PosX => (1, 0, 0),
            Face::NegX => (-1, 0, 0),
            Face::PosY => (0, 1, 0),
            Face::NegY => (0, -1, 0),
            Face::PosZ => (0, 0, 1),
            Face::NegZ => (0, 0, -1),
        }
    }
}
