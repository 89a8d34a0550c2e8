//! The stateful mesh accumulator and its primitive-building operations.

use nalgebra::{Point2, Point3, Vector3};

use crate::error::{GenError, Result};
use crate::geom::{triangulate, Path, Polygon};

use super::bundle::{MeshData, SubmeshData};
use super::model::{
    Material, MeshElement, MeshPlane, MeshRoom, MeshTriangle, MeshVertex, TriangleKey, VertexKey,
};

#[derive(Debug)]
struct Submesh {
    triangles: Vec<Option<MeshTriangle>>,
    material: Material,
}

/// A stateful accumulator of shared vertices and per-submesh triangles.
///
/// One builder owns one mesh's buffers exclusively. Building operations
/// append vertices and triangles and return handles; [`apply`](Self::apply)
/// is the single commit point that turns the buffers into a [`MeshData`]
/// bundle. Nothing added after a commit affects the emitted bundle unless
/// `apply` is called again.
#[derive(Debug, Default)]
pub struct MeshBuilder {
    vertices: Vec<Option<MeshVertex>>,
    submeshes: Vec<Submesh>,
}

impl MeshBuilder {
    /// Create an empty builder with no submeshes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an empty submesh with the given material and return its
    /// index. Indices are dense and monotonically increasing from 0.
    pub fn add_submesh(&mut self, material: Material) -> usize {
        self.submeshes.push(Submesh { triangles: Vec::new(), material });
        self.submeshes.len() - 1
    }

    /// Number of submeshes allocated so far.
    pub fn submesh_count(&self) -> usize {
        self.submeshes.len()
    }

    /// Append a vertex and return its stable handle.
    pub fn add_vertex(&mut self, position: Point3<f64>, uv: Point2<f64>) -> VertexKey {
        self.push_vertex(MeshVertex::new(position, uv))
    }

    /// Append a vertex carrying a secondary UV channel.
    pub fn add_vertex_with_uv2(
        &mut self,
        position: Point3<f64>,
        uv: Point2<f64>,
        uv2: Point2<f64>,
    ) -> VertexKey {
        self.push_vertex(MeshVertex { position, uv, uv2 })
    }

    fn push_vertex(&mut self, vertex: MeshVertex) -> VertexKey {
        let key = VertexKey::new(self.vertices.len());
        self.vertices.push(Some(vertex));
        key
    }

    /// Access a vertex by handle.
    ///
    /// # Panics
    /// Panics if the vertex was removed.
    pub fn vertex(&self, key: VertexKey) -> &MeshVertex {
        self.vertices[key.slot()].as_ref().expect("vertex was removed")
    }

    /// Mutably access a vertex by handle.
    ///
    /// # Panics
    /// Panics if the vertex was removed.
    pub fn vertex_mut(&mut self, key: VertexKey) -> &mut MeshVertex {
        self.vertices[key.slot()].as_mut().expect("vertex was removed")
    }

    /// Remove a vertex. Its handle becomes invalid; triangles still
    /// referencing it make the next commit fail.
    pub fn remove_vertex(&mut self, key: VertexKey) {
        self.vertices[key.slot()] = None;
    }

    /// Append a triangle to a submesh's list.
    ///
    /// # Errors
    /// [`GenError::SubmeshOutOfRange`] if `submesh` was never allocated.
    pub fn add_triangle(
        &mut self,
        submesh: usize,
        v1: VertexKey,
        v2: VertexKey,
        v3: VertexKey,
    ) -> Result<TriangleKey> {
        if submesh >= self.submeshes.len() {
            return Err(GenError::SubmeshOutOfRange { submesh, count: self.submeshes.len() });
        }
        let triangles = &mut self.submeshes[submesh].triangles;
        let key = TriangleKey::new(submesh, triangles.len());
        triangles.push(Some(MeshTriangle { submesh, vertices: [v1, v2, v3] }));
        Ok(key)
    }

    /// Remove a triangle from its submesh. Associated vertices stay.
    pub fn remove_triangle(&mut self, key: TriangleKey) {
        self.submeshes[key.submesh()].triangles[key.slot()] = None;
    }

    /// Build the two triangles of a quad from 4 existing vertices that
    /// already carry their UV data. Vertex order must be clockwise as seen
    /// from the visible side.
    pub fn add_plane(
        &mut self,
        submesh: usize,
        v1: VertexKey,
        v2: VertexKey,
        v3: VertexKey,
        v4: VertexKey,
    ) -> Result<MeshPlane> {
        let t1 = self.add_triangle(submesh, v1, v3, v2)?;
        let t2 = self.add_triangle(submesh, v1, v4, v3)?;
        Ok(MeshPlane { vertices: [v1, v2, v3, v4], triangles: [t1, t2] })
    }

    /// Build the 4 vertices and 2 triangles of a quad.
    ///
    /// The vector `p1 -> p2` maps to the UV height axis and `p1 -> p4` to
    /// the UV length axis: `p2` gets `(uv_start.x, uv_end.y)` and `p4` gets
    /// `(uv_end.x, uv_start.y)`. Points must be coplanar and wound
    /// clockwise from the visible side, or the face normal is inverted.
    #[allow(clippy::too_many_arguments)]
    pub fn build_plane(
        &mut self,
        submesh: usize,
        p1: Point3<f64>,
        p2: Point3<f64>,
        p3: Point3<f64>,
        p4: Point3<f64>,
        uv_start: Point2<f64>,
        uv_end: Point2<f64>,
    ) -> Result<MeshPlane> {
        let v1 = self.add_vertex(p1, uv_start);
        let v2 = self.add_vertex(p2, Point2::new(uv_start.x, uv_end.y));
        let v3 = self.add_vertex(p3, uv_end);
        let v4 = self.add_vertex(p4, Point2::new(uv_end.x, uv_start.y));
        self.add_plane(submesh, v1, v2, v3, v4)
    }

    /// Remove all triangles and vertices of a plane.
    pub fn remove_plane(&mut self, plane: &MeshPlane) {
        for v in plane.vertices {
            self.remove_vertex(v);
        }
        for t in plane.triangles {
            self.remove_triangle(t);
        }
    }

    /// Fan-triangulate a flat circle around `center`, facing up.
    ///
    /// `n_edges` outer vertices are spaced evenly; each outer vertex's UV
    /// is its local `(x, z)` offset from the center (a planar projection,
    /// not normalized). `flip` reverses the winding for downward faces.
    pub fn build_circle(
        &mut self,
        submesh: usize,
        center: Point3<f64>,
        radius: f64,
        n_edges: usize,
        flip: bool,
    ) -> Result<MeshElement> {
        let mut vertices = Vec::with_capacity(n_edges + 1);
        let mut triangles = Vec::with_capacity(n_edges);

        let center_vertex = self.add_vertex(center, Point2::new(0.0, 0.0));
        vertices.push(center_vertex);

        let angle_step = 360.0 / n_edges as f64;
        let mut first = None;
        let mut prev = None;
        for i in 0..n_edges {
            let angle = (i as f64 * angle_step).to_radians();
            let x = radius * angle.sin();
            let z = radius * angle.cos();
            let current =
                self.add_vertex(center + Vector3::new(x, 0.0, z), Point2::new(x, z));
            vertices.push(current);

            if let Some(prev) = prev {
                triangles.push(if flip {
                    self.add_triangle(submesh, center_vertex, current, prev)?
                } else {
                    self.add_triangle(submesh, center_vertex, prev, current)?
                });
            } else {
                first = Some(current);
            }
            prev = Some(current);

            if i == n_edges - 1 {
                let first = first.expect("circle has at least one edge");
                triangles.push(if flip {
                    self.add_triangle(submesh, center_vertex, first, current)?
                } else {
                    self.add_triangle(submesh, center_vertex, current, first)?
                });
            }
        }

        Ok(MeshElement { submesh, vertices, triangles })
    }

    /// Build a UV sphere from a `(rows + 1) x (cols + 1)` grid mapped
    /// through spherical coordinates.
    ///
    /// `width_radius` scales the equatorial axes and `height_radius` the
    /// polar axis. The top and bottom rows collapse to pole singularities;
    /// that is expected, not an error.
    pub fn build_sphere(
        &mut self,
        submesh: usize,
        center: Point3<f64>,
        width_radius: f64,
        height_radius: f64,
        rows: usize,
        cols: usize,
    ) -> Result<MeshElement> {
        use std::f64::consts::PI;

        let num_vertices = (rows + 1) * (cols + 1);
        let mut vertices = Vec::with_capacity(num_vertices);
        for i in 0..num_vertices {
            let x = (i % (cols + 1)) as f64;
            let y = (i / (cols + 1)) as f64;
            let u = x / cols as f64;
            let v = y / rows as f64;

            let position = center
                + Vector3::new(
                    width_radius * (u * 2.0 * PI).cos() * (v * PI - PI / 2.0).cos(),
                    height_radius * (v * PI - PI / 2.0).sin(),
                    width_radius * (u * 2.0 * PI).sin() * (v * PI - PI / 2.0).cos(),
                );
            vertices.push(self.add_vertex(position, Point2::new(u, v)));
        }

        // Regular grid triangulation: two triangles per cell, walked in
        // alternating even/odd pairs.
        let num_triangles = 2 * rows * cols;
        let mut triangles = Vec::with_capacity(num_triangles);
        for i in 0..num_triangles {
            let (t0, t1, t2) = if i % 2 == 0 {
                let t0 = i / 2 + i / (2 * cols);
                (t0, t0 + 1, t0 + cols + 1)
            } else {
                let t0 = (i + 1) / 2 + i / (2 * cols);
                let t1 = t0 + cols + 1;
                (t0, t1, t1 - 1)
            };
            triangles.push(self.add_triangle(submesh, vertices[t0], vertices[t2], vertices[t1])?);
        }

        Ok(MeshElement { submesh, vertices, triangles })
    }

    /// Build a cylinder: two capping circles (the bottom one flipped) and
    /// `n_edges` side-wall quads.
    ///
    /// Per wall segment the UV y-axis spans `0..height` and the x-axis
    /// `0..1`; the x-axis is not globally continuous around the cylinder.
    pub fn build_cylinder(
        &mut self,
        submesh: usize,
        base: Point3<f64>,
        radius: f64,
        height: f64,
        n_edges: usize,
    ) -> Result<MeshElement> {
        self.build_segmented_cylinder(submesh, base, &[radius, radius], &[height], n_edges)
    }

    /// Build a stack of cylinder frustum segments sharing one axis.
    ///
    /// `radii` has one entry per ring boundary, so it must hold exactly
    /// `heights.len() + 1` entries; the caps use the first and last radius.
    ///
    /// # Errors
    /// [`GenError::SegmentedCylinderArity`] on a radius/height count
    /// mismatch.
    pub fn build_segmented_cylinder(
        &mut self,
        submesh: usize,
        base: Point3<f64>,
        radii: &[f64],
        heights: &[f64],
        n_edges: usize,
    ) -> Result<MeshElement> {
        if radii.len() != heights.len() + 1 {
            return Err(GenError::SegmentedCylinderArity {
                radii: radii.len(),
                heights: heights.len(),
            });
        }

        let total_height: f64 = heights.iter().sum();
        let bottom_cap = self.build_circle(submesh, base, radii[0], n_edges, true)?;
        let top_cap = self.build_circle(
            submesh,
            base + Vector3::new(0.0, total_height, 0.0),
            radii[radii.len() - 1],
            n_edges,
            false,
        )?;

        let mut vertices = bottom_cap.vertices;
        let mut triangles = bottom_cap.triangles;
        vertices.extend(top_cap.vertices);
        triangles.extend(top_cap.triangles);

        let angle_step = 360.0 / n_edges as f64;
        let mut current_height = 0.0;
        for (s, &segment_height) in heights.iter().enumerate() {
            let mut first = None;
            let mut prev = None;
            for i in 0..n_edges {
                let angle = (i as f64 * angle_step).to_radians();
                let bot = base
                    + Vector3::new(
                        radii[s] * angle.sin(),
                        current_height,
                        radii[s] * angle.cos(),
                    );
                let top = base
                    + Vector3::new(
                        radii[s + 1] * angle.sin(),
                        current_height + segment_height,
                        radii[s + 1] * angle.cos(),
                    );

                if let Some((prev_bot, prev_top)) = prev {
                    let wall = self.build_plane(
                        submesh,
                        prev_bot,
                        prev_top,
                        top,
                        bot,
                        Point2::new(0.0, current_height),
                        Point2::new(1.0, current_height + segment_height),
                    )?;
                    vertices.extend(wall.vertices);
                    triangles.extend(wall.triangles);
                } else {
                    first = Some((bot, top));
                }
                prev = Some((bot, top));

                if i == n_edges - 1 {
                    let (first_bot, first_top) = first.expect("cylinder has at least one edge");
                    let wall = self.build_plane(
                        submesh,
                        bot,
                        top,
                        first_top,
                        first_bot,
                        Point2::new(0.0, current_height),
                        Point2::new(1.0, current_height + segment_height),
                    )?;
                    vertices.extend(wall.vertices);
                    triangles.extend(wall.triangles);
                }
            }
            current_height += segment_height;
        }

        Ok(MeshElement { submesh, vertices, triangles })
    }

    /// Fill a polygon at a fixed altitude, one vertex per polygon point.
    ///
    /// UVs are the polygon's planar projection scaled by `uv_scale`;
    /// `flip` reverses the winding (and mirrors the u-axis) for downward
    /// faces such as ceilings.
    pub fn build_polygon(
        &mut self,
        submesh: usize,
        polygon: &Polygon,
        altitude: f64,
        uv_scale: f64,
        flip: bool,
    ) -> Result<MeshElement> {
        let uvs = polygon.uvs(uv_scale, flip);
        let vertices: Vec<VertexKey> = polygon
            .points()
            .iter()
            .zip(uvs)
            .map(|(p, uv)| self.add_vertex(Point3::new(p.x, altitude, p.y), uv))
            .collect();

        let mut triangles = Vec::new();
        for tri in triangulate(polygon, flip)? {
            triangles.push(self.add_triangle(
                submesh,
                vertices[tri[0]],
                vertices[tri[1]],
                vertices[tri[2]],
            )?);
        }

        Ok(MeshElement { submesh, vertices, triangles })
    }

    /// Build a full room from its ground plan: floor at altitude 0, a
    /// flipped ceiling at `height`, and one wall quad per ground-plan edge.
    ///
    /// Wall UV-x runs cumulatively (in the negative direction) along the
    /// perimeter so wall textures tile continuously around the room. Three
    /// submeshes are allocated, in floor / ceiling / wall order.
    #[allow(clippy::too_many_arguments)]
    pub fn build_room(
        &mut self,
        ground_plan: &Polygon,
        height: f64,
        floor_material: Material,
        wall_material: Material,
        ceiling_material: Material,
        floor_uv_scale: f64,
        wall_uv_scale: f64,
    ) -> Result<MeshRoom> {
        let floor_submesh = self.add_submesh(floor_material);
        let floor = self.build_polygon(floor_submesh, ground_plan, 0.0, floor_uv_scale, false)?;

        let ceiling_submesh = self.add_submesh(ceiling_material);
        let ceiling =
            self.build_polygon(ceiling_submesh, ground_plan, height, floor_uv_scale, true)?;

        let wall_submesh = self.add_submesh(wall_material);
        let mut walls = Vec::with_capacity(ground_plan.len());
        let mut uv_start = 0.0;
        for i in 0..ground_plan.len() {
            let (point, next) = ground_plan.edge(i);
            let uv_end = uv_start - (next - point).norm();

            let v1 = self.add_vertex(
                Point3::new(point.x, 0.0, point.y),
                Point2::new(uv_start * wall_uv_scale, 0.0),
            );
            let v2 = self.add_vertex(
                Point3::new(point.x, height, point.y),
                Point2::new(uv_start * wall_uv_scale, height * wall_uv_scale),
            );
            let v3 = self.add_vertex(
                Point3::new(next.x, height, next.y),
                Point2::new(uv_end * wall_uv_scale, height * wall_uv_scale),
            );
            let v4 = self.add_vertex(
                Point3::new(next.x, 0.0, next.y),
                Point2::new(uv_end * wall_uv_scale, 0.0),
            );
            walls.push(self.add_plane(wall_submesh, v1, v2, v3, v4)?);

            uv_start = uv_end;
        }

        Ok(MeshRoom { floor, ceiling, walls, floor_submesh, ceiling_submesh, wall_submesh })
    }

    /// Build a road ribbon along a path: one upward quad per pair of
    /// successive cross-sections.
    ///
    /// UV-x spans the width and UV-y accumulates the center-line distance
    /// scaled by `uv_scale_y`, so the surface texture flows along the road.
    ///
    /// # Errors
    /// [`GenError::PathTooShort`] if the path has fewer than 2
    /// cross-sections.
    pub fn build_path(
        &mut self,
        submesh: usize,
        path: &Path,
        uv_scale_y: f64,
    ) -> Result<MeshElement> {
        let lines = path.lines();
        if lines.len() < 2 {
            return Err(GenError::PathTooShort { lines: lines.len() });
        }

        let mut vertices = Vec::new();
        let mut triangles = Vec::new();
        let mut distance = 0.0;
        for pair in lines.windows(2) {
            let (prev, current) = (&pair[0], &pair[1]);
            let next_distance = distance + (current.center() - prev.center()).norm();

            let quad = self.build_plane(
                submesh,
                prev.right(),
                current.right(),
                current.left(),
                prev.left(),
                Point2::new(0.0, distance * uv_scale_y),
                Point2::new(1.0, next_distance * uv_scale_y),
            )?;
            vertices.extend(quad.vertices);
            triangles.extend(quad.triangles);

            distance = next_distance;
        }

        Ok(MeshElement { submesh, vertices, triangles })
    }

    /// Carve a rectangular hole into a previously built plane.
    ///
    /// The plane is removed and the surrounding frame rebuilt as up to 4
    /// quads: a left and right strip, plus a top strip only when the
    /// hole's top edge is below the plane's top edge and a bottom strip
    /// only when the hole's bottom edge is above the plane's bottom edge.
    /// Omitting a strip when the hole touches that edge avoids degenerate
    /// zero-area quads.
    ///
    /// `hole_center` and `hole_dims` are measured in the plane's own local
    /// frame (`v1 -> v4` is the width axis, `v1 -> v2` the height axis),
    /// so the plane need not be axis-aligned in world space. The plane
    /// must be a true rectangle; behavior is undefined otherwise.
    pub fn carve_hole_in_plane(
        &mut self,
        submesh: usize,
        plane: &MeshPlane,
        hole_center: Point2<f64>,
        hole_dims: Point2<f64>,
    ) -> Result<()> {
        let [v1, v2, v3, v4] = plane.vertices;
        let (p1, uv1) = (self.vertex(v1).position, self.vertex(v1).uv);
        let (p2, uv2) = (self.vertex(v2).position, self.vertex(v2).uv);
        let (p3, uv3) = (self.vertex(v3).position, self.vertex(v3).uv);
        let (p4, uv4) = (self.vertex(v4).position, self.vertex(v4).uv);

        self.remove_plane(plane);

        // Hole bounds as fractions of the plane's local axes.
        let axis_x = p4 - p1;
        let len_x = axis_x.norm();
        let x_start = (hole_center.x - hole_dims.x / 2.0) / len_x;
        let x_end = (hole_center.x + hole_dims.x / 2.0) / len_x;

        let axis_y = p2 - p1;
        let len_y = axis_y.norm();
        let y_start = (hole_center.y - hole_dims.y / 2.0) / len_y;
        let y_end = (hole_center.y + hole_dims.y / 2.0) / len_y;

        let uv_start_x = uv1.x + x_start * (uv4.x - uv1.x);
        let uv_end_x = uv1.x + x_end * (uv4.x - uv1.x);
        let uv_start_y = uv1.y + y_start * (uv2.y - uv1.y);
        let uv_end_y = uv1.y + y_end * (uv2.y - uv1.y);

        // Full-height side strips.
        let sb1 = p1 + x_start * axis_x;
        let st1 = p2 + x_start * axis_x;
        let st2 = p2 + x_end * axis_x;
        let sb2 = p1 + x_end * axis_x;

        // Hole corners.
        let hb1 = p1 + x_start * axis_x + y_start * axis_y;
        let ht1 = p1 + x_start * axis_x + y_end * axis_y;
        let ht2 = p1 + x_end * axis_x + y_end * axis_y;
        let hb2 = p1 + x_end * axis_x + y_start * axis_y;

        self.build_plane(submesh, p1, p2, st1, sb1, uv1, Point2::new(uv_start_x, uv2.y))?;
        self.build_plane(submesh, sb2, st2, p3, p4, Point2::new(uv_end_x, uv1.y), uv3)?;

        if hole_center.y + hole_dims.y / 2.0 < len_y {
            self.build_plane(
                submesh,
                ht1,
                st1,
                st2,
                ht2,
                Point2::new(uv_start_x, uv_end_y),
                Point2::new(uv_end_x, uv3.y),
            )?;
        }

        if hole_center.y - hole_dims.y / 2.0 > 0.0 {
            self.build_plane(
                submesh,
                sb1,
                hb1,
                hb2,
                sb2,
                Point2::new(uv_start_x, uv1.y),
                Point2::new(uv_end_x, uv_start_y),
            )?;
        }

        Ok(())
    }

    /// Commit the accumulated buffers into a [`MeshData`] bundle.
    ///
    /// Assigns each live vertex a dense id in buffer order and flattens
    /// every submesh's triangle list into an index array. Idempotent:
    /// calling `apply` twice without intervening mutation yields identical
    /// bundles.
    ///
    /// # Errors
    /// [`GenError::DanglingVertex`] if a triangle references a removed
    /// vertex.
    pub fn apply(&self) -> Result<MeshData> {
        let mut ids: Vec<Option<u32>> = vec![None; self.vertices.len()];
        let mut positions = Vec::new();
        let mut uv = Vec::new();
        let mut uv2 = Vec::new();
        for (slot, vertex) in self.vertices.iter().enumerate() {
            if let Some(vertex) = vertex {
                ids[slot] = Some(positions.len() as u32);
                positions.push(vertex.position);
                uv.push(vertex.uv);
                uv2.push(vertex.uv2);
            }
        }

        let mut submeshes = Vec::with_capacity(self.submeshes.len());
        for (submesh_index, submesh) in self.submeshes.iter().enumerate() {
            let mut indices = Vec::new();
            for triangle in submesh.triangles.iter().flatten() {
                for vertex in triangle.vertices {
                    indices.push(
                        ids[vertex.slot()]
                            .ok_or(GenError::DanglingVertex { submesh: submesh_index })?,
                    );
                }
            }
            submeshes.push(SubmeshData { indices, material: submesh.material.clone() });
        }

        log::trace!(
            "committed mesh: {} vertices, {} submeshes",
            positions.len(),
            submeshes.len()
        );
        Ok(MeshData::new(positions, uv, uv2, submeshes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_builder() -> (MeshBuilder, usize, MeshPlane) {
        // A vertical 4 (wide) x 3 (high) wall in the x-y plane.
        let mut builder = MeshBuilder::new();
        let submesh = builder.add_submesh(Material::new("wall"));
        let plane = builder
            .build_plane(
                submesh,
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(0.0, 3.0, 0.0),
                Point3::new(4.0, 3.0, 0.0),
                Point3::new(4.0, 0.0, 0.0),
                Point2::new(0.0, 0.0),
                Point2::new(4.0, 3.0),
            )
            .unwrap();
        (builder, submesh, plane)
    }

    /// Total area of all committed triangles.
    fn committed_area(data: &MeshData) -> f64 {
        let mut area = 0.0;
        for submesh in data.submeshes() {
            for tri in submesh.indices.chunks(3) {
                let a = data.positions()[tri[0] as usize];
                let b = data.positions()[tri[1] as usize];
                let c = data.positions()[tri[2] as usize];
                area += (b - a).cross(&(c - a)).norm() / 2.0;
            }
        }
        area
    }

    #[test]
    fn test_plane_uv_corners() {
        let (builder, _, plane) = quad_builder();
        assert_eq!(builder.vertex(plane.vertices[0]).uv, Point2::new(0.0, 0.0));
        assert_eq!(builder.vertex(plane.vertices[1]).uv, Point2::new(0.0, 3.0));
        assert_eq!(builder.vertex(plane.vertices[2]).uv, Point2::new(4.0, 3.0));
        assert_eq!(builder.vertex(plane.vertices[3]).uv, Point2::new(4.0, 0.0));
    }

    #[test]
    fn test_add_triangle_submesh_out_of_range() {
        let mut builder = MeshBuilder::new();
        let v = builder.add_vertex(Point3::origin(), Point2::origin());
        let err = builder.add_triangle(0, v, v, v).unwrap_err();
        assert!(matches!(err, GenError::SubmeshOutOfRange { submesh: 0, count: 0 }));
    }

    #[test]
    fn test_carve_hole_area() {
        // Interior hole: all 4 strips, area = plane - hole.
        let (mut builder, submesh, plane) = quad_builder();
        builder
            .carve_hole_in_plane(
                submesh,
                &plane,
                Point2::new(2.0, 1.5),
                Point2::new(1.2, 2.0),
            )
            .unwrap();
        let data = builder.apply().unwrap();
        assert!((committed_area(&data) - (12.0 - 2.4)).abs() < 1e-9);
    }

    #[test]
    fn test_carve_hole_touching_bottom_skips_strip() {
        // A doorway: hole bottom flush with the plane bottom. The bottom
        // strip is omitted, so 3 quads = 6 triangles remain.
        let (mut builder, submesh, plane) = quad_builder();
        builder
            .carve_hole_in_plane(
                submesh,
                &plane,
                Point2::new(2.0, 1.0),
                Point2::new(1.2, 2.0),
            )
            .unwrap();
        let data = builder.apply().unwrap();
        assert_eq!(data.triangle_count(), 6);
        assert!((committed_area(&data) - (12.0 - 2.4)).abs() < 1e-9);
    }

    #[test]
    fn test_circle_flip_reverses_winding() {
        let mut plain = MeshBuilder::new();
        let s = plain.add_submesh(Material::new("m"));
        plain.build_circle(s, Point3::origin(), 1.0, 8, false).unwrap();
        let mut flipped = MeshBuilder::new();
        let s = flipped.add_submesh(Material::new("m"));
        flipped.build_circle(s, Point3::origin(), 1.0, 8, true).unwrap();

        let up = plain.apply().unwrap();
        let down = flipped.apply().unwrap();
        let normal_y = |data: &MeshData, tri: &[u32]| {
            let a = data.positions()[tri[0] as usize];
            let b = data.positions()[tri[1] as usize];
            let c = data.positions()[tri[2] as usize];
            (b - a).cross(&(c - a)).y
        };
        for (u, d) in up.submeshes()[0]
            .indices
            .chunks(3)
            .zip(down.submeshes()[0].indices.chunks(3))
        {
            assert!(normal_y(&up, u) * normal_y(&down, d) < 0.0);
        }
    }

    #[test]
    fn test_sphere_counts_and_poles() {
        let mut builder = MeshBuilder::new();
        let s = builder.add_submesh(Material::new("m"));
        let element = builder
            .build_sphere(s, Point3::origin(), 2.0, 3.0, 4, 6)
            .unwrap();
        assert_eq!(element.vertices.len(), 5 * 7);
        assert_eq!(element.triangles.len(), 2 * 4 * 6);

        // Bottom row sits at -height, top row at +height.
        let bottom = builder.vertex(element.vertices[0]).position;
        assert!((bottom.y + 3.0).abs() < 1e-9);
        let top = builder.vertex(element.vertices[5 * 7 - 1]).position;
        assert!((top.y - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_segmented_cylinder_quad_count() {
        let mut builder = MeshBuilder::new();
        let s = builder.add_submesh(Material::new("m"));
        let n_edges = 12;
        let heights = [1.0, 2.0, 0.5];
        let radii = [2.0, 1.5, 1.5, 0.5];
        let element = builder
            .build_segmented_cylinder(s, Point3::origin(), &radii, &heights, n_edges)
            .unwrap();

        // Two cap fans plus one quad (2 triangles) per edge per segment.
        let side_triangles = element.triangles.len() - 2 * n_edges;
        assert_eq!(side_triangles / 2, heights.len() * n_edges);
    }

    #[test]
    fn test_segmented_cylinder_arity_contract() {
        let mut builder = MeshBuilder::new();
        let s = builder.add_submesh(Material::new("m"));
        let err = builder
            .build_segmented_cylinder(s, Point3::origin(), &[1.0, 1.0], &[1.0, 1.0], 8)
            .unwrap_err();
        assert!(matches!(err, GenError::SegmentedCylinderArity { radii: 2, heights: 2 }));
    }

    #[test]
    fn test_apply_idempotent() {
        let (mut builder, submesh, plane) = quad_builder();
        builder
            .carve_hole_in_plane(submesh, &plane, Point2::new(2.0, 1.5), Point2::new(1.0, 1.0))
            .unwrap();
        let first = builder.apply().unwrap();
        let second = builder.apply().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_apply_dangling_vertex() {
        let mut builder = MeshBuilder::new();
        let s = builder.add_submesh(Material::new("m"));
        let v1 = builder.add_vertex(Point3::origin(), Point2::origin());
        let v2 = builder.add_vertex(Point3::new(1.0, 0.0, 0.0), Point2::origin());
        let v3 = builder.add_vertex(Point3::new(0.0, 1.0, 0.0), Point2::origin());
        builder.add_triangle(s, v1, v2, v3).unwrap();
        builder.remove_vertex(v2);
        assert!(matches!(builder.apply(), Err(GenError::DanglingVertex { submesh: 0 })));
    }

    #[test]
    fn test_room_wall_count_and_uv_run() {
        let plan = Polygon::rectangle(6.0, 4.0);
        let mut builder = MeshBuilder::new();
        let room = builder
            .build_room(
                &plan,
                3.0,
                Material::new("floor"),
                Material::new("wall"),
                Material::new("ceiling"),
                1.0,
                1.0,
            )
            .unwrap();

        assert_eq!(room.walls.len(), 4);
        assert_eq!(
            (room.floor_submesh, room.ceiling_submesh, room.wall_submesh),
            (0, 1, 2)
        );

        // Wall UV-x accumulates negatively along the perimeter.
        let second_wall_start = builder.vertex(room.walls[1].vertices[0]).uv.x;
        assert!((second_wall_start + 6.0).abs() < 1e-9);
        let last_wall_end = builder.vertex(room.walls[3].vertices[3]).uv.x;
        assert!((last_wall_end + 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_build_path_too_short() {
        use crate::geom::{Path, PathLine};
        let mut builder = MeshBuilder::new();
        let s = builder.add_submesh(Material::new("road"));
        let path = Path::new(vec![PathLine::new(Point3::origin(), 0.0, 2.0)]);
        assert!(matches!(
            builder.build_path(s, &path, 1.0),
            Err(GenError::PathTooShort { lines: 1 })
        ));
    }

    #[test]
    fn test_build_path_quads_face_up() {
        use crate::geom::{Path, PathLine};
        let mut builder = MeshBuilder::new();
        let s = builder.add_submesh(Material::new("road"));
        let path = Path::new(vec![
            PathLine::new(Point3::new(0.0, 0.0, 0.0), 0.0, 2.0),
            PathLine::new(Point3::new(0.0, 0.0, 1.0), 0.0, 2.0),
            PathLine::new(Point3::new(0.0, 0.0, 2.0), 0.0, 2.0),
        ]);
        let element = builder.build_path(s, &path, 1.0).unwrap();
        assert_eq!(element.triangles.len(), 4);

        let data = builder.apply().unwrap();
        for tri in data.submeshes()[0].indices.chunks(3) {
            let a = data.positions()[tri[0] as usize];
            let b = data.positions()[tri[1] as usize];
            let c = data.positions()[tri[2] as usize];
            assert!((b - a).cross(&(c - a)).y > 0.0, "ribbon face should point up");
        }
    }
}
