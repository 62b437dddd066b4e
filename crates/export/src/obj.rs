use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use terrain_common::Color;
use terrain_mesh::GridMesh;

use crate::format::general;
use crate::{ExportError, ExportedFiles};

const RULE: &str = "########################################################";

/// Significant digits for vertex coordinates.
const COORD_PRECISION: usize = 6;
/// Significant digits for material colors.
const COLOR_PRECISION: usize = 4;

/// Material file that accompanies the OBJ at `obj_path`.
pub fn material_path(obj_path: &Path) -> PathBuf {
    obj_path.with_extension("mtl")
}

/// Write the `snow` and `color` materials.
pub fn write_material<W: Write>(out: &mut W, color: Color) -> io::Result<()> {
    writeln!(out, "newmtl snow")?;
    writeln!(out, "illum 4")?;
    writeln!(out, "Kd 1.0 1.0 1.0")?;
    writeln!(out, "Ka 0.0 0.0 0.0")?;
    writeln!(out, "Tf 1.0 1.0 1.0")?;
    writeln!(out, "Ni 1.00")?;
    writeln!(out)?;
    writeln!(out, "newmtl color")?;
    writeln!(out, "illum 4")?;
    writeln!(
        out,
        "Kd {} {} {}",
        general(f64::from(color.r), COLOR_PRECISION),
        general(f64::from(color.g), COLOR_PRECISION),
        general(f64::from(color.b), COLOR_PRECISION),
    )?;
    writeln!(out, "Ka 0.0 0.0 0.0")?;
    writeln!(out, "Tf 1.0 1.0 1.0")?;
    writeln!(out, "Ni 1.00")?;
    Ok(())
}

/// Write the mesh geometry, referencing materials from `mtl_name`.
///
/// Each cell becomes two triangles sharing the cell's first corner; the cell's
/// material is chosen from that corner's height.
pub fn write_obj<W: Write>(out: &mut W, mesh: &GridMesh, mtl_name: &str) -> io::Result<()> {
    let point_rows = mesh.point_rows();
    let point_cols = mesh.point_cols();

    writeln!(out, "{RULE}")?;
    writeln!(out, "#")?;
    writeln!(out, "# Created with Terrain Modeler")?;
    writeln!(out, "#")?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "#")?;
    writeln!(out, "# Vertices: {}", point_rows * point_cols)?;
    writeln!(out, "# Faces: {}", 2 * mesh.rows() * mesh.cols())?;
    writeln!(out, "#")?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "mtllib {mtl_name}")?;

    let mut heights = Vec::with_capacity(mesh.point_count());
    for (_, p) in mesh.points() {
        writeln!(
            out,
            "v {} {} {}",
            general(p.x(), COORD_PRECISION),
            general(p.y(), COORD_PRECISION),
            general(p.z(), COORD_PRECISION),
        )?;
        heights.push(p.y());
    }

    let snow = mesh.snow_cap_height();
    for r in 1..point_rows {
        for c in 1..point_cols {
            let v1 = (r - 1) * point_cols + c;
            let v2 = v1 + 1;
            let v3 = v1 + point_cols;
            let v4 = v3 + 1;

            let corner = heights[(r - 1) * point_cols + (c - 1)];
            let material = if corner >= snow { "snow" } else { "color" };
            writeln!(out, "usemtl {material}")?;
            writeln!(out, "f {v1} {v4} {v2}")?;
            writeln!(out, "f {v1} {v3} {v4}")?;
        }
    }
    Ok(())
}

/// Write `<path>` as OBJ and the sibling `.mtl` file, material first.
pub fn export(mesh: &GridMesh, path: &Path) -> Result<ExportedFiles, ExportError> {
    let mtl_path = material_path(path);
    let mtl_name = mtl_path
        .file_name()
        .ok_or_else(|| ExportError::InvalidPath(path.to_path_buf()))?
        .to_string_lossy()
        .into_owned();

    let file = File::create(&mtl_path).map_err(ExportError::io(&mtl_path))?;
    let mut writer = BufWriter::new(file);
    write_material(&mut writer, mesh.color()).map_err(ExportError::io(&mtl_path))?;
    writer.flush().map_err(ExportError::io(&mtl_path))?;

    let file = File::create(path).map_err(ExportError::io(path))?;
    let mut writer = BufWriter::new(file);
    write_obj(&mut writer, mesh, &mtl_name).map_err(ExportError::io(path))?;
    writer.flush().map_err(ExportError::io(path))?;

    tracing::info!(obj = %path.display(), mtl = %mtl_path.display(), "exported mesh");
    Ok(ExportedFiles {
        obj: path.to_path_buf(),
        mtl: mtl_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use terrain_common::GridIndex;

    fn flat(rows: usize, cols: usize, color: Color) -> GridMesh {
        let mut rng = StdRng::seed_from_u64(0);
        let mut mesh = GridMesh::new(rows, cols, 2.0, 2.0, color, &mut rng)
            .unwrap()
            .with_snow_cap_height(1.0);
        mesh.flatten();
        mesh
    }

    fn render_obj(mesh: &GridMesh) -> String {
        let mut buf = Vec::new();
        write_obj(&mut buf, mesh, "out.mtl").unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn material_file_layout() {
        let mut buf = Vec::new();
        write_material(&mut buf, Color::new(1.0, 0.4, 0.0)).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let expected = "newmtl snow\nillum 4\nKd 1.0 1.0 1.0\nKa 0.0 0.0 0.0\nTf 1.0 1.0 1.0\nNi 1.00\n\n\
                        newmtl color\nillum 4\nKd 1 0.4 0\nKa 0.0 0.0 0.0\nTf 1.0 1.0 1.0\nNi 1.00\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn obj_header_counts() {
        let text = render_obj(&flat(2, 3, Color::BLUE));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], RULE);
        assert_eq!(lines[6], "# Vertices: 12");
        assert_eq!(lines[7], "# Faces: 12");
        assert_eq!(lines[10], "mtllib out.mtl");
        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 12);
        assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), 12);
        assert_eq!(text.lines().filter(|l| l.starts_with("usemtl")).count(), 6);
    }

    #[test]
    fn single_cell_body() {
        let mut mesh = flat(1, 1, Color::BLUE);
        mesh.set_height(GridIndex::new(0, 0), 1.5).unwrap();
        let text = render_obj(&mesh);
        let body: Vec<&str> = text.lines().skip(11).collect();
        assert_eq!(
            body,
            vec![
                "v -1 1.5 -1",
                "v 1 0 -1",
                "v -1 0 1",
                "v 1 0 1",
                "usemtl snow",
                "f 1 4 2",
                "f 1 3 4",
            ]
        );
    }

    #[test]
    fn face_indices_use_point_columns() {
        let text = render_obj(&flat(2, 2, Color::BLUE));
        let faces: Vec<&str> = text.lines().filter(|l| l.starts_with("f ")).collect();
        // Cell (1, 0): v1 = 1 * 3 + 1 = 4.
        assert_eq!(faces[4], "f 4 8 5");
        assert_eq!(faces[5], "f 4 7 8");
        assert_eq!(faces[7], "f 5 8 9");
        assert!(text.lines().filter(|l| l.starts_with("usemtl")).all(|l| l == "usemtl color"));
    }

    #[test]
    fn export_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terrain.obj");
        let mesh = flat(2, 2, Color::GREEN);

        let files = export(&mesh, &path).unwrap();
        assert_eq!(files.obj, path);
        assert_eq!(files.mtl, dir.path().join("terrain.mtl"));

        let obj = std::fs::read_to_string(&files.obj).unwrap();
        assert!(obj.contains("mtllib terrain.mtl\n"));
        let mtl = std::fs::read_to_string(&files.mtl).unwrap();
        assert!(mtl.contains("Kd 0 1 0\n"));
    }

    #[test]
    fn path_without_extension_gets_mtl_suffix() {
        assert_eq!(material_path(Path::new("out/mesh")), PathBuf::from("out/mesh.mtl"));
        assert_eq!(material_path(Path::new("a.b/mesh.obj")), PathBuf::from("a.b/mesh.mtl"));
    }

    #[test]
    fn unwritable_location_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("mesh.obj");
        let err = export(&flat(1, 1, Color::BLUE), &path).unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
    }
}
