//! The dependency graph engine.

use std::collections::BTreeSet;

use log::trace;

use crate::item::ItemType;
use crate::level::{DependencyLevel, FileType};
use crate::meta;
use crate::provider::{DeformerProvider, FileProvider, MaterialReader, ModelReader, XrefCache};
use crate::root::{Root, RootId};
use crate::Result;

/// Resolves dependency relationships between character asset files.
///
/// The engine is a stateless composition of five collaborators and holds no
/// caches of its own; repeated queries hit the collaborators again, which are
/// free to memoize. It is `Send + Sync`, so one instance can serve concurrent
/// queries.
///
/// Traversal queries return `Ok(None)` when the question does not apply to
/// the path (unclassifiable files have no place in the hierarchy), and
/// `Ok(Some(vec![]))` when it applies but nothing was found.
pub struct DependencyGraph<'a> {
    files: &'a dyn FileProvider,
    models: &'a dyn ModelReader,
    materials: &'a dyn MaterialReader,
    deformers: &'a dyn DeformerProvider,
    xrefs: &'a dyn XrefCache,
}

impl<'a> DependencyGraph<'a> {
    /// Assembles an engine from its collaborators.
    pub fn new(
        files: &'a dyn FileProvider,
        models: &'a dyn ModelReader,
        materials: &'a dyn MaterialReader,
        deformers: &'a dyn DeformerProvider,
        xrefs: &'a dyn XrefCache,
    ) -> DependencyGraph<'a> {
        DependencyGraph {
            files,
            models,
            materials,
            deformers,
            xrefs,
        }
    }

    pub(crate) fn files(&self) -> &dyn FileProvider {
        self.files
    }

    pub(crate) fn deformers(&self) -> &dyn DeformerProvider {
        self.deformers
    }

    /// Binds an identity to this engine for expansion.
    pub fn root(&self, id: RootId) -> Root<'_> {
        Root::new(id, self)
    }

    /// Every root a path belongs to, de-duplicated and sorted by canonical
    /// path.
    ///
    /// Textures are looked up in the cross-reference cache first, since their
    /// own paths often carry no identity. Structural extraction covers every
    /// file inside an item tree, and metadata record paths fall back to
    /// offset arithmetic. Paths outside all three resolve to nothing.
    pub fn resolve_roots(&self, path: &str) -> Result<Vec<RootId>> {
        let mut found = BTreeSet::new();

        if FileType::from_path(path) == FileType::Tex {
            let parents = self.xrefs.declared_parents(path)?;
            trace!("texture {path} has {} declared parents", parents.len());
            for parent in &parents {
                if let Some(root) = RootId::extract(parent) {
                    found.insert(root);
                }
            }
        }

        if let Some(root) = RootId::extract(path) {
            found.insert(root);
        }

        if found.is_empty() {
            if let Some(root) = meta::root_from_record_path(path) {
                found.insert(root);
            }
        }

        Ok(found.into_iter().collect())
    }

    /// The paths one level above `path` in the hierarchy.
    ///
    /// Roots have no parents, models report their root, materials the models
    /// that reference them, and textures the materials that reference them
    /// across every tree the texture belongs to.
    pub fn parents(&self, path: &str) -> Result<Option<Vec<String>>> {
        match DependencyLevel::from_path(path) {
            DependencyLevel::Invalid => Ok(None),
            DependencyLevel::Root => Ok(Some(Vec::new())),
            DependencyLevel::Model => {
                let roots = self.resolve_roots(path)?;
                Ok(Some(
                    roots.iter().map(|r| r.root_path().to_owned()).collect(),
                ))
            }
            DependencyLevel::Material => {
                let mut out = BTreeSet::new();
                for id in self.resolve_roots(path)? {
                    for model in self.root(id).model_paths()? {
                        if self.lists(&model, path)? {
                            out.insert(model);
                        }
                    }
                }
                Ok(Some(out.into_iter().collect()))
            }
            DependencyLevel::Texture => {
                let mut out = BTreeSet::new();
                for id in self.resolve_roots(path)? {
                    for material in self.root(id).material_paths()? {
                        if self.lists(&material, path)? {
                            out.insert(material);
                        }
                    }
                }
                Ok(Some(out.into_iter().collect()))
            }
        }
    }

    /// Whether `path` appears among the children of `parent`.
    fn lists(&self, parent: &str, path: &str) -> Result<bool> {
        let children = self.children(parent)?.unwrap_or_default();
        Ok(children.iter().any(|child| child == path))
    }

    /// The paths one level below `path` in the hierarchy.
    ///
    /// Roots expand to their model paths. Model children come from the model
    /// reader, with skin materials included when the model belongs to a human
    /// body tree; material children come from the material reader. Textures
    /// have no children.
    pub fn children(&self, path: &str) -> Result<Option<Vec<String>>> {
        match DependencyLevel::from_path(path) {
            DependencyLevel::Invalid => Ok(None),
            DependencyLevel::Root => {
                let mut out = BTreeSet::new();
                for id in self.resolve_roots(path)? {
                    out.extend(self.root(id).model_paths()?);
                }
                Ok(Some(out.into_iter().collect()))
            }
            DependencyLevel::Model => {
                let include_skin = self.resolve_roots(path)?.iter().any(|root| {
                    root.primary_type() == ItemType::Human
                        && root.secondary_type() == Some(ItemType::Body)
                });
                Ok(Some(self.models.referenced_materials(path, include_skin)?))
            }
            DependencyLevel::Material => Ok(Some(self.materials.referenced_textures(path)?)),
            DependencyLevel::Texture => Ok(Some(Vec::new())),
        }
    }

    /// The paths sharing a parent with `path`, itself included.
    pub fn siblings(&self, path: &str) -> Result<Option<Vec<String>>> {
        let Some(parents) = self.parents(path)? else {
            return Ok(None);
        };
        let mut out = BTreeSet::new();
        for parent in parents {
            out.extend(self.children(&parent)?.unwrap_or_default());
        }
        Ok(Some(out.into_iter().collect()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::provider::StaticRaceList;
    use crate::race::Race;

    const EQ_MODEL_MID: &str = "chara/equipment/e6016/model/c0101e6016_top.mdl";
    const EQ_MODEL_MIDF: &str = "chara/equipment/e6016/model/c0201e6016_top.mdl";
    const EQ_MAT_MID: &str = "chara/equipment/e6016/material/v0001/mt_c0101e6016_top_a.mtrl";
    const EQ_MAT_MIDF: &str = "chara/equipment/e6016/material/v0001/mt_c0201e6016_top_a.mtrl";
    const EQ_TEX_D: &str = "chara/equipment/e6016/texture/v01_c0101e6016_top_d.tex";
    const EQ_TEX_N: &str = "chara/equipment/e6016/texture/v01_c0101e6016_top_n.tex";
    const EQ_TEX_MIDF: &str = "chara/equipment/e6016/texture/v01_c0201e6016_top_d.tex";
    const ACC_MODEL: &str = "chara/accessory/a0001/model/c0101a0001_nek.mdl";
    const ACC_MAT: &str = "chara/accessory/a0001/material/v0001/mt_c0101a0001_nek_a.mtrl";
    const SHARED_TEX: &str = "chara/common/texture/skin_m.tex";
    const BODY_MODEL: &str = "chara/human/c0101/obj/body/b0001/model/c0101b0001_top.mdl";
    const BODY_SKIN_MAT: &str =
        "chara/human/c0101/obj/body/b0001/material/v0001/mt_c0101b0001_a.mtrl";
    const WEP_MODEL: &str = "chara/weapon/w0201/obj/body/b0001/model/w0201b0001.mdl";
    const WEP_MAT: &str = "chara/weapon/w0201/obj/body/b0001/material/v0001/mt_w0201b0001_a.mtrl";

    #[derive(Default)]
    struct MemoryFiles {
        files: HashMap<String, Vec<u8>>,
    }

    impl FileProvider for MemoryFiles {
        fn read_file(&self, path: &str) -> Result<Option<Vec<u8>>> {
            Ok(self.files.get(path).cloned())
        }

        fn data_offset(&self, path: &str) -> Result<u64> {
            Ok(u64::from(self.files.contains_key(path)))
        }
    }

    #[derive(Default)]
    struct StubModels {
        by_model: HashMap<String, Vec<String>>,
        skin: HashMap<String, Vec<String>>,
    }

    impl ModelReader for StubModels {
        fn referenced_materials(
            &self,
            model_path: &str,
            include_skin: bool,
        ) -> Result<Vec<String>> {
            let mut out = self.by_model.get(model_path).cloned().unwrap_or_default();
            if include_skin {
                out.extend(self.skin.get(model_path).cloned().unwrap_or_default());
            }
            Ok(out)
        }
    }

    #[derive(Default)]
    struct StubMaterials {
        by_material: HashMap<String, Vec<String>>,
    }

    impl MaterialReader for StubMaterials {
        fn referenced_textures(&self, material_path: &str) -> Result<Vec<String>> {
            Ok(self
                .by_material
                .get(material_path)
                .cloned()
                .unwrap_or_default())
        }
    }

    #[derive(Default)]
    struct MemoryXrefs {
        parents: HashMap<String, Vec<String>>,
    }

    impl XrefCache for MemoryXrefs {
        fn declared_parents(&self, child_path: &str) -> Result<Vec<String>> {
            Ok(self.parents.get(child_path).cloned().unwrap_or_default())
        }
    }

    struct Fixture {
        files: MemoryFiles,
        models: StubModels,
        materials: StubMaterials,
        deformers: StaticRaceList,
        xrefs: MemoryXrefs,
    }

    impl Fixture {
        fn graph(&self) -> DependencyGraph<'_> {
            DependencyGraph::new(
                &self.files,
                &self.models,
                &self.materials,
                &self.deformers,
                &self.xrefs,
            )
        }
    }

    fn owned(paths: &[&str]) -> Vec<String> {
        paths.iter().map(|p| (*p).to_owned()).collect()
    }

    fn fixture() -> Fixture {
        let mut files = MemoryFiles::default();
        // set format, one subset
        files
            .files
            .insert("chara/equipment/e6016/e6016.imc".to_owned(), vec![1, 0, 31, 0]);
        // non-set format, two subsets
        files.files.insert(
            "chara/weapon/w0201/obj/body/b0001/b0001.imc".to_owned(),
            vec![2, 0, 1, 0],
        );

        let mut models = StubModels::default();
        models
            .by_model
            .insert(EQ_MODEL_MID.to_owned(), owned(&[EQ_MAT_MID]));
        models
            .by_model
            .insert(EQ_MODEL_MIDF.to_owned(), owned(&[EQ_MAT_MIDF]));
        models
            .by_model
            .insert(ACC_MODEL.to_owned(), owned(&[ACC_MAT]));
        models
            .by_model
            .insert(WEP_MODEL.to_owned(), owned(&[WEP_MAT]));
        models
            .skin
            .insert(BODY_MODEL.to_owned(), owned(&[BODY_SKIN_MAT]));

        let mut materials = StubMaterials::default();
        materials
            .by_material
            .insert(EQ_MAT_MID.to_owned(), owned(&[EQ_TEX_D, EQ_TEX_N]));
        materials
            .by_material
            .insert(EQ_MAT_MIDF.to_owned(), owned(&[EQ_TEX_MIDF, SHARED_TEX]));
        materials
            .by_material
            .insert(ACC_MAT.to_owned(), owned(&[SHARED_TEX]));

        let mut xrefs = MemoryXrefs::default();
        xrefs
            .parents
            .insert(SHARED_TEX.to_owned(), owned(&[EQ_MAT_MIDF, ACC_MAT]));
        xrefs
            .parents
            .insert(EQ_TEX_D.to_owned(), owned(&[EQ_MAT_MID]));

        Fixture {
            files,
            models,
            materials,
            deformers: StaticRaceList::new(vec![
                Race::HyurMidlanderMale,
                Race::HyurMidlanderFemale,
            ]),
            xrefs,
        }
    }

    #[test]
    fn structural_resolution_finds_one_root_per_tree_file() {
        let fx = fixture();
        let graph = fx.graph();
        let expected = RootId::equipment(6016, "top").unwrap();
        for path in [
            "chara/equipment/e6016/e6016_top.root",
            EQ_MODEL_MID,
            EQ_MAT_MID,
            EQ_TEX_D,
        ] {
            assert_eq!(graph.resolve_roots(path).unwrap(), vec![expected.clone()]);
        }
    }

    #[test]
    fn shared_textures_resolve_to_every_owning_root() {
        let fx = fixture();
        let graph = fx.graph();
        let roots = graph.resolve_roots(SHARED_TEX).unwrap();
        assert_eq!(
            roots,
            vec![
                RootId::accessory(1, "nek").unwrap(),
                RootId::equipment(6016, "top").unwrap(),
            ]
        );
    }

    #[test]
    fn metadata_record_paths_resolve_by_offset_arithmetic() {
        let fx = fixture();
        let graph = fx.graph();

        let roots = graph
            .resolve_roots("chara/xls/equipmentparameter/equipmentparameter.eqp::336")
            .unwrap();
        assert_eq!(roots, vec![RootId::equipment(5, "dwn").unwrap()]);

        let roots = graph
            .resolve_roots("chara/xls/charadb/accessorydeformerparameter/c0101.eqdp::162")
            .unwrap();
        assert_eq!(roots, vec![RootId::accessory(10, "nek").unwrap()]);

        let roots = graph
            .resolve_roots("chara/equipment/e6016/e6016.imc::80")
            .unwrap();
        assert_eq!(roots, vec![RootId::equipment(6016, "top").unwrap()]);
    }

    #[test]
    fn paths_outside_every_tree_resolve_to_nothing() {
        let fx = fixture();
        let graph = fx.graph();
        let furniture = "bgcommon/hou/indoor/general/0078/material/fun_b0_m0078_0a.mtrl";

        assert!(graph.resolve_roots(furniture).unwrap().is_empty());
        assert!(graph.resolve_roots("exd/item.exh").unwrap().is_empty());

        // orphaned but classifiable files answer traversal with empty sets
        assert_eq!(graph.parents(furniture).unwrap(), Some(Vec::new()));
        assert_eq!(graph.siblings(furniture).unwrap(), Some(Vec::new()));
    }

    #[test]
    fn parents_walk_one_level_up() {
        let fx = fixture();
        let graph = fx.graph();

        assert_eq!(graph.parents("exd/item.exh").unwrap(), None);
        assert_eq!(
            graph
                .parents("chara/equipment/e6016/e6016_top.root")
                .unwrap(),
            Some(Vec::new())
        );
        assert_eq!(
            graph.parents(EQ_MODEL_MID).unwrap(),
            Some(owned(&["chara/equipment/e6016/e6016_top.root"]))
        );
        assert_eq!(
            graph.parents(EQ_MAT_MID).unwrap(),
            Some(owned(&[EQ_MODEL_MID]))
        );
        assert_eq!(graph.parents(EQ_TEX_D).unwrap(), Some(owned(&[EQ_MAT_MID])));
    }

    #[test]
    fn texture_parents_span_trees() {
        let fx = fixture();
        let graph = fx.graph();
        assert_eq!(
            graph.parents(SHARED_TEX).unwrap(),
            Some(owned(&[ACC_MAT, EQ_MAT_MIDF]))
        );
    }

    #[test]
    fn children_walk_one_level_down() {
        let fx = fixture();
        let graph = fx.graph();

        assert_eq!(graph.children("exd/item.exh").unwrap(), None);
        assert_eq!(
            graph
                .children("chara/equipment/e6016/e6016_top.root")
                .unwrap(),
            Some(owned(&[EQ_MODEL_MID, EQ_MODEL_MIDF]))
        );
        assert_eq!(
            graph.children(EQ_MODEL_MID).unwrap(),
            Some(owned(&[EQ_MAT_MID]))
        );
        assert_eq!(
            graph.children(EQ_MAT_MID).unwrap(),
            Some(owned(&[EQ_TEX_D, EQ_TEX_N]))
        );
        assert_eq!(graph.children(EQ_TEX_D).unwrap(), Some(Vec::new()));
    }

    #[test]
    fn human_body_models_pick_up_skin_materials() {
        let fx = fixture();
        let graph = fx.graph();
        assert_eq!(
            graph.children(BODY_MODEL).unwrap(),
            Some(owned(&[BODY_SKIN_MAT]))
        );
    }

    #[test]
    fn traversal_levels_stay_adjacent() {
        let fx = fixture();
        let graph = fx.graph();

        for parent in graph.parents(EQ_MAT_MID).unwrap().unwrap() {
            assert_eq!(DependencyLevel::from_path(&parent), DependencyLevel::Model);
        }
        for parent in graph.parents(SHARED_TEX).unwrap().unwrap() {
            assert_eq!(
                DependencyLevel::from_path(&parent),
                DependencyLevel::Material
            );
        }
        for child in graph.children(EQ_MODEL_MID).unwrap().unwrap() {
            assert_eq!(
                DependencyLevel::from_path(&child),
                DependencyLevel::Material
            );
        }
    }

    #[test]
    fn children_and_parents_invert() {
        let fx = fixture();
        let graph = fx.graph();
        let root_path = "chara/equipment/e6016/e6016_top.root";

        for model in graph.children(root_path).unwrap().unwrap() {
            let parents = graph.parents(&model).unwrap().unwrap();
            assert_eq!(parents, owned(&[root_path]));

            for material in graph.children(&model).unwrap().unwrap() {
                let parents = graph.parents(&material).unwrap().unwrap();
                assert!(parents.contains(&model));
            }
        }
    }

    #[test]
    fn siblings_share_a_parent_and_include_self() {
        let fx = fixture();
        let graph = fx.graph();

        assert_eq!(
            graph.siblings(EQ_MODEL_MID).unwrap(),
            Some(owned(&[EQ_MODEL_MID, EQ_MODEL_MIDF]))
        );
        assert_eq!(
            graph.siblings(EQ_TEX_D).unwrap(),
            Some(owned(&[EQ_TEX_D, EQ_TEX_N]))
        );
        assert_eq!(graph.siblings("exd/item.exh").unwrap(), None);
    }

    #[test]
    fn root_entity_expands_models_and_metadata() {
        let fx = fixture();
        let graph = fx.graph();
        let root = graph.root(RootId::equipment(6016, "top").unwrap());

        assert_eq!(
            root.model_paths().unwrap(),
            owned(&[EQ_MODEL_MID, EQ_MODEL_MIDF])
        );
        assert_eq!(
            root.material_paths().unwrap(),
            owned(&[EQ_MAT_MID, EQ_MAT_MIDF])
        );
        assert_eq!(
            root.texture_paths().unwrap(),
            owned(&[SHARED_TEX, EQ_TEX_D, EQ_TEX_N, EQ_TEX_MIDF])
        );

        let records = root.meta_record_paths().unwrap();
        // one eqp record, one eqdp record per playable race, two imc records
        assert_eq!(records.len(), 1 + Race::PLAYABLE.len() + 2);
        assert_eq!(
            records[0],
            "chara/xls/equipmentparameter/equipmentparameter.eqp::385024"
        );
        assert!(records
            .iter()
            .any(|p| p == "chara/xls/charadb/equipmentdeformerparameter/c0101.eqdp::96258"));
        assert!(records
            .iter()
            .any(|p| p == "chara/equipment/e6016/e6016.imc::80"));
        assert!(records
            .iter()
            .any(|p| p == "chara/equipment/e6016/e6016.imc::320"));
    }

    #[test]
    fn weapon_imc_records_follow_non_set_layout() {
        let fx = fixture();
        let graph = fx.graph();
        let root = graph.root(RootId::weapon(201, 1).unwrap());

        assert!(root.eqp_record_path().is_none());
        assert!(root.eqdp_record_paths().is_empty());
        assert_eq!(
            root.imc_record_paths().unwrap(),
            owned(&[
                "chara/weapon/w0201/obj/body/b0001/b0001.imc::32",
                "chara/weapon/w0201/obj/body/b0001/b0001.imc::80",
                "chara/weapon/w0201/obj/body/b0001/b0001.imc::128",
            ])
        );
    }

    #[test]
    fn absent_imc_files_expose_no_records() {
        let fx = fixture();
        let graph = fx.graph();
        let root = graph.root(RootId::weapon(9999, 1).unwrap());
        assert!(root.imc_record_paths().unwrap().is_empty());
        assert_eq!(root.meta_record_paths().unwrap(), Vec::<String>::new());
    }
}
