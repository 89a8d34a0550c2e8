//! Wavefront OBJ export for committed geometry bundles.

use std::io::Write;

use crate::dungeon::DungeonLayout;
use crate::error::Result;
use crate::mesh::MeshData;

/// Write named geometry bundles as one OBJ document.
///
/// Each bundle becomes an `o` object; each of its submeshes emits a
/// `usemtl` group named after its material. Vertex and texture
/// coordinates are written in parallel, so faces reference the same index
/// for both.
pub fn write_obj<W: Write>(writer: &mut W, objects: &[(&str, &MeshData)]) -> Result<()> {
    let mut vertex_offset: u32 = 1; // OBJ indices are 1-based
    for (name, mesh) in objects {
        writeln!(writer, "o {name}")?;
        for p in mesh.positions() {
            writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
        }
        for uv in mesh.uv() {
            writeln!(writer, "vt {} {}", uv.x, uv.y)?;
        }
        for submesh in mesh.submeshes() {
            writeln!(writer, "usemtl {}", submesh.material.name())?;
            for triangle in submesh.indices.chunks_exact(3) {
                let (a, b, c) = (
                    triangle[0] + vertex_offset,
                    triangle[1] + vertex_offset,
                    triangle[2] + vertex_offset,
                );
                writeln!(writer, "f {a}/{a} {b}/{b} {c}/{c}")?;
            }
        }
        vertex_offset += mesh.vertex_count() as u32;
    }
    Ok(())
}

/// Commit every module of a layout and write it together with all gate
/// meshes as one OBJ document.
pub fn write_layout_obj<W: Write>(writer: &mut W, layout: &DungeonLayout) -> Result<()> {
    let module_meshes = layout
        .modules
        .iter()
        .map(|module| module.mesh())
        .collect::<Result<Vec<_>>>()?;

    let mut objects: Vec<(String, &MeshData)> =
        Vec::with_capacity(module_meshes.len() + layout.gates.len());
    for ((i, module), mesh) in layout.modules.iter().enumerate().zip(&module_meshes) {
        objects.push((format!("{:?}_{i}", module.kind()).to_lowercase(), mesh));
    }
    for (i, gate) in layout.gates.iter().enumerate() {
        objects.push((format!("gate_{i}"), gate.mesh()));
    }

    let refs: Vec<(&str, &MeshData)> =
        objects.iter().map(|(name, mesh)| (name.as_str(), *mesh)).collect();
    write_obj(writer, &refs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{Material, MeshBuilder};
    use nalgebra::{Point2, Point3};

    #[test]
    fn test_obj_output_for_a_single_quad() {
        let mut builder = MeshBuilder::new();
        let submesh = builder.add_submesh(Material::new("stone"));
        builder
            .build_plane(
                submesh,
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 1.0),
            )
            .unwrap();
        let mesh = builder.apply().unwrap();

        let mut out = Vec::new();
        write_obj(&mut out, &[("quad", &mesh)]).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("o quad\n"));
        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 4);
        assert_eq!(text.lines().filter(|l| l.starts_with("vt ")).count(), 4);
        assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), 2);
        assert!(text.contains("usemtl stone"));
        // 1-based indices
        assert!(text.contains("f 1/1 3/3 2/2"));
    }

    #[test]
    fn test_vertex_indices_continue_across_objects() {
        let build_quad = || {
            let mut builder = MeshBuilder::new();
            let submesh = builder.add_submesh(Material::new("stone"));
            builder
                .build_plane(
                    submesh,
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(0.0, 1.0, 0.0),
                    Point3::new(1.0, 1.0, 0.0),
                    Point3::new(1.0, 0.0, 0.0),
                    Point2::new(0.0, 0.0),
                    Point2::new(1.0, 1.0),
                )
                .unwrap();
            builder.apply().unwrap()
        };
        let (a, b) = (build_quad(), build_quad());

        let mut out = Vec::new();
        write_obj(&mut out, &[("a", &a), ("b", &b)]).unwrap();
        let text = String::from_utf8(out).unwrap();

        // The second object's faces start at index 5.
        assert!(text.contains("f 5/5 7/7 6/6"));
    }
}
