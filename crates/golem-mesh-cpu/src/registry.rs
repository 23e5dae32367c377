use crate::MeshBuild;

/// Renderer-facing mesh handle. 0 is reserved and never allocated; valid
/// handles start at 1.
pub type MeshId = u32;

/// Mesh ownership interface of the renderer collaborator. Synthesis hands
/// finished vertex/index data over and refers to it by handle afterwards.
///
/// Access is exclusive per call (`&mut`); callers sharing one registry
/// across threads must serialize externally.
pub trait MeshRegistry {
    /// Registers new mesh content and returns its handle.
    fn create(&mut self, build: MeshBuild) -> MeshId;
    /// Replaces the content behind an existing handle.
    fn update(&mut self, id: MeshId, build: MeshBuild);
    /// Releases a handle; the registry may hand it out again later.
    fn release(&mut self, id: MeshId);
}

/// In-memory mesh registry. Handles are slot numbers offset by one;
/// released slots are reused before the table grows.
#[derive(Default)]
pub struct MeshStore {
    meshes: Vec<Option<MeshBuild>>,
    free: Vec<MeshId>,
}

impl MeshStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, id: MeshId) -> Option<&MeshBuild> {
        if id == 0 {
            return None;
        }
        self.meshes.get(id as usize - 1)?.as_ref()
    }

    /// Number of live meshes.
    pub fn len(&self) -> usize {
        self.meshes.iter().filter(|m| m.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MeshRegistry for MeshStore {
    fn create(&mut self, build: MeshBuild) -> MeshId {
        if let Some(id) = self.free.pop() {
            self.meshes[id as usize - 1] = Some(build);
            return id;
        }
        self.meshes.push(Some(build));
        self.meshes.len() as MeshId
    }

    fn update(&mut self, id: MeshId, build: MeshBuild) {
        let slot = if id == 0 {
            None
        } else {
            self.meshes.get_mut(id as usize - 1)
        };
        match slot {
            Some(slot) if slot.is_some() => *slot = Some(build),
            _ => log::warn!("update for unknown mesh handle {}", id),
        }
    }

    fn release(&mut self, id: MeshId) {
        if id == 0 {
            return;
        }
        if let Some(slot) = self.meshes.get_mut(id as usize - 1) {
            if slot.take().is_some() {
                self.free.push(id);
            }
        }
    }
}
