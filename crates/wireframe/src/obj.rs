use std::io::{self, Write};

use crate::Mesh;

/// Writes `mesh` as a Wavefront OBJ wireframe: one `v` record per vertex in
/// row-major `[i][j]` order and one `l` record per grid edge.
pub fn write_obj<W: Write>(mesh: &Mesh, mut out: W) -> io::Result<()> {
    let resolution = mesh.resolution();
    writeln!(
        out,
        "# wireframe {}x{} ({} vertices, {} edges)",
        resolution.u_count(),
        resolution.v_count(),
        mesh.vertex_count(),
        mesh.edge_count()
    )?;
    for point in mesh.rows().iter().flatten() {
        writeln!(out, "v {} {} {}", point.x, point.y, point.z)?;
    }
    // OBJ indices are 1-based.
    let index = |(i, j): (usize, usize)| i * resolution.v_count() + j + 1;
    for (a, b) in mesh.edges() {
        writeln!(out, "l {} {}", index(a), index(b))?;
    }
    out.flush()
}
