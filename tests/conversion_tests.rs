mod support;

use nalgebra::{Point2, Point3, Vector3};
use o3d_convert::convert::ConversionContext;
use o3d_convert::errors::ConversionError;
use o3d_convert::float_types::Real;
use o3d_convert::mapping::MappingVectors;
use o3d_convert::options::{ConversionOptions, ConversionVariant, ExportMode};
use o3d_convert::scene::{Scene, SceneMaterial, SceneMesh};
use o3d_convert::sector::{Color, Sector};
use o3d_convert::transform::ImportTransform;
use o3d_convert::convert_scene;
use support::*;

fn defaults() -> ConversionOptions {
    ConversionOptions::default()
}

/// Check that every polygon's mapping reproduces the stored UV of each corner.
fn assert_mappings_reproduce_uvs(sector: &Sector, context: &ConversionContext, channel: usize) {
    for (index, triangle) in context.triangles.iter().enumerate() {
        let polygon = &sector.polygons[index];
        let mapping = polygon.mappings[channel].expect("mapping for channel");
        let vectors = MappingVectors::from_plane(&sector.planes[polygon.plane]);
        let corners = sector.polygon_positions(index).unwrap();
        let tex = triangle.tex_vertices[channel].unwrap();
        for (corner, t) in corners.iter().zip(tex) {
            let expected = context.tex_vertices[channel][t];
            let got = mapping.texture_coordinates(&vectors.project(corner));
            assert!(
                approx_eq(got.x, expected.x as Real, 1e-5) && approx_eq(got.y, expected.y as Real, 1e-5),
                "triangle {index}: got {got:?}, expected {expected:?}"
            );
        }
    }
}

#[test]
fn shared_position_is_deduplicated() {
    // the origin appears in three separate vertex slots
    let origin = v3(0.0, 0.0, 0.0);
    let mesh = triangle_soup(
        &[
            [origin, v3(1.0, 0.0, 0.0), v3(0.0, 1.0, 0.0)],
            [origin, v3(0.0, 1.0, 0.0), v3(-1.0, 0.0, 0.0)],
            [origin, v3(-1.0, 0.0, 0.0), v3(0.0, -1.0, 0.0)],
        ],
        &[
            [uv(0.5, 0.5), uv(1.0, 0.5), uv(0.5, 1.0)],
            [uv(0.5, 0.5), uv(0.5, 1.0), uv(0.0, 0.5)],
            [uv(0.5, 0.5), uv(0.0, 0.5), uv(0.5, 0.0)],
        ],
        0,
    );
    let scene = scene(vec![mesh], &["floor"]);

    let context = ConversionContext::fill(&scene, &ImportTransform::identity(), &defaults()).unwrap();
    assert_eq!(context.vertices.len(), 5);
    assert_eq!(context.tex_vertices[0].len(), 5);
    let references = context
        .triangles
        .iter()
        .filter(|t| t.vertices.contains(&0))
        .count();
    assert_eq!(references, 3);

    let sector = convert_scene(&scene, &ImportTransform::identity(), &defaults()).unwrap();
    assert_eq!(sector.vertices.len(), 5);
    assert_eq!(sector.polygons.len(), 3);
    for polygon in 0..3 {
        assert_eq!(sector.polygon_vertex_indices(polygon).unwrap()[0], 0);
    }
}

#[test]
fn first_occurrence_order_across_meshes() {
    let a = scene(vec![unit_quad(0), unit_quad(0)], &["stone"]);
    let context = ConversionContext::fill(&a, &ImportTransform::identity(), &defaults()).unwrap();

    // second quad repeats the first, nothing new is added; Y and Z are flipped
    assert_eq!(
        context.vertices,
        vec![
            Vector3::new(0.0, -0.0, -0.0),
            Vector3::new(1.0, -0.0, -0.0),
            Vector3::new(0.0, -1.0, -0.0),
            Vector3::new(1.0, -1.0, -0.0),
        ]
    );
    assert_eq!(context.triangles[2].vertices, context.triangles[0].vertices);
    assert_eq!(context.triangles[3].vertices, [2, 1, 3]);
    // UVs are not flipped
    assert_eq!(context.tex_vertices[0][2], Point2::new(0.0, 1.0));
}

#[test]
fn transform_then_axis_flip() {
    let mesh = triangle_soup(
        &[[v3(1.0, 2.0, 3.0), v3(2.0, 2.0, 3.0), v3(1.0, 3.0, 3.0)]],
        &[[uv(0.0, 0.0), uv(1.0, 0.0), uv(0.0, 1.0)]],
        0,
    );
    let scene = scene(vec![mesh], &["steel"]);
    let sector = convert_scene(&scene, &ImportTransform::scaling(2.0, 2.0, 2.0), &defaults()).unwrap();
    assert_eq!(sector.vertices[0].pos, Point3::new(2.0, -4.0, -6.0));
}

#[test]
fn mirroring_transform_reverses_corners() {
    let scene = scene(vec![unit_quad(0)], &["stone"]);
    let plain = ConversionContext::fill(&scene, &ImportTransform::identity(), &defaults()).unwrap();
    let mirror = ImportTransform::scaling(-1.0, 1.0, 1.0);
    let mirrored = ConversionContext::fill(&scene, &mirror, &defaults()).unwrap();

    for (p, m) in plain.triangles.iter().zip(&mirrored.triangles) {
        let mut reversed = p.vertices;
        reversed.reverse();
        assert_eq!(m.vertices, reversed);

        let mut reversed_tex = p.tex_vertices[0].unwrap();
        reversed_tex.reverse();
        assert_eq!(m.tex_vertices[0], Some(reversed_tex));
    }

    // normals keep facing the same way relative to the mirrored geometry
    let plain_sector = convert_scene(&scene, &ImportTransform::identity(), &defaults()).unwrap();
    let mirrored_sector = convert_scene(&scene, &mirror, &defaults()).unwrap();
    assert_eq!(plain_sector.planes[0].normal, mirrored_sector.planes[0].normal);
}

#[test]
fn triangles_group_by_source_material() {
    let scene = scene(
        vec![unit_quad(1), unit_quad(0), unit_quad(1)],
        &["first", "second"],
    );
    let context = ConversionContext::fill(&scene, &ImportTransform::identity(), &defaults()).unwrap();

    assert_eq!(context.materials.len(), 2);
    assert_eq!(context.materials[0].tag, 1);
    assert_eq!(context.materials[0].name, "second");
    assert_eq!(context.materials[0].triangles, vec![0, 1, 4, 5]);
    assert_eq!(context.materials[1].tag, 0);
    assert_eq!(context.materials[1].triangles, vec![2, 3]);
    assert!(context.triangles[4..].iter().all(|t| t.material == 0));

    let sector = convert_scene(&scene, &ImportTransform::identity(), &defaults()).unwrap();
    assert_eq!(sector.materials.len(), 2);
    assert_eq!(sector.polygons[2].material, 1);
    assert_eq!(sector.polygons[2].color, sector.materials[1].color);
}

#[test]
fn material_names_and_colors() {
    let mut scene = scene(
        vec![unit_quad(0), unit_quad(1), unit_quad(2)],
        &["", "x", "granite"],
    );
    scene.materials[2] = SceneMaterial::named("granite").with_diffuse([1.0, 0.0, 0.0, 1.0]);

    let multi = ConversionContext::fill(&scene, &ImportTransform::identity(), &defaults()).unwrap();
    assert_eq!(multi.materials[0].name, "Default");
    assert_eq!(multi.materials[0].color, Color::GRAY);
    assert_eq!(multi.materials[1].name, "Default");
    assert_eq!(multi.materials[2].name, "granite");
    // third of three meshes gets the top of the range
    assert_eq!(multi.materials[2].color, Color(u32::MAX));

    let single_options = defaults().with_variant(ConversionVariant::SingleChannel);
    let single = ConversionContext::fill(&scene, &ImportTransform::identity(), &single_options).unwrap();
    assert_eq!(single.materials[2].color, Color(0xFF00_00FF));
}

#[test]
fn edges_are_not_shared_between_triangles() {
    let scene = scene(vec![unit_quad(0)], &["stone"]);
    let sector = convert_scene(&scene, &ImportTransform::identity(), &defaults()).unwrap();

    assert_eq!(sector.vertices.len(), 4);
    assert_eq!(sector.edges.len(), 6);
    assert_eq!(sector.planes.len(), 2);
    // the diagonal exists once per triangle, in opposite directions
    assert_eq!(sector.edges[1].start, sector.edges[3].end);
    assert_eq!(sector.edges[1].end, sector.edges[3].start);
    assert_ne!(sector.polygons[0].edges[1], sector.polygons[1].edges[0]);
}

#[test]
fn polygon_mappings_reproduce_imported_uvs() {
    let mesh = triangle_soup(
        &[
            [v3(0.0, 0.0, 0.0), v3(4.0, 0.0, 1.0), v3(0.0, 3.0, 0.0)],
            [v3(1.0, 1.0, 1.0), v3(1.0, 2.0, 3.0), v3(2.0, 1.0, 5.0)],
        ],
        &[
            [uv(0.1, 0.2), uv(0.9, 0.25), uv(0.15, 0.8)],
            [uv(0.0, 0.0), uv(2.0, 0.0), uv(0.0, -1.0)],
        ],
        0,
    );
    let scene = scene(vec![mesh], &["brick"]);

    for variant in [ConversionVariant::MultiChannel, ConversionVariant::SingleChannel] {
        let options = defaults().with_variant(variant);
        let context = ConversionContext::fill(&scene, &ImportTransform::identity(), &options).unwrap();
        let sector = convert_scene(&scene, &ImportTransform::identity(), &options).unwrap();
        assert_mappings_reproduce_uvs(&sector, &context, 0);
    }
}

#[test]
fn single_channel_variant_shifts_v() {
    let scene = scene(vec![unit_quad(0)], &["stone"]);
    let options = defaults().with_variant(ConversionVariant::SingleChannel);
    let context = ConversionContext::fill(&scene, &ImportTransform::identity(), &options).unwrap();
    assert_eq!(context.tex_vertices[0][0], Point2::new(0.0, -1.0));
    assert_eq!(context.tex_vertices[0][2], Point2::new(0.0, 0.0));
}

#[test]
fn secondary_channels_are_optional_per_mesh() {
    let lightmapped = unit_quad(0).with_uv_channel(
        1,
        vec![uv(0.0, 0.0), uv(0.5, 0.0), uv(0.0, 0.5), uv(0.5, 0.5)],
    );
    let scene = scene(vec![lightmapped, unit_quad(0)], &["stone"]);

    let multi = convert_scene(&scene, &ImportTransform::identity(), &defaults()).unwrap();
    assert!(multi.polygons[0].mappings[1].is_some());
    assert!(multi.polygons[2].mappings[1].is_none());
    assert!(multi.polygons.iter().all(|p| p.mappings[0].is_some()));
    assert!(multi.polygons.iter().all(|p| p.mappings[2].is_none()));

    let single_options = defaults().with_variant(ConversionVariant::SingleChannel);
    let single = convert_scene(&scene, &ImportTransform::identity(), &single_options).unwrap();
    assert!(single.polygons.iter().all(|p| p.mappings[1].is_none()));
}

#[test]
fn opened_mode_disconnects_materials() {
    let scene = scene(vec![unit_quad(0), unit_quad(1)], &["left", "right"]);
    let options = defaults().with_mode(ExportMode::Opened);
    let sector = convert_scene(&scene, &ImportTransform::identity(), &options).unwrap();

    assert_eq!(sector.vertices.len(), 8);
    let first = sector.polygon_vertex_indices(0).unwrap();
    let second = sector.polygon_vertex_indices(2).unwrap();
    assert!(first.iter().all(|v| !second.contains(v)));
    assert_eq!(sector.vertices[first[0]].pos, sector.vertices[second[0]].pos);
    assert!(first.iter().all(|&v| v < 4));
    assert!(second.iter().all(|&v| v >= 4));
}

#[test]
fn unwrapped_mode_places_vertices_at_uvs() {
    let mesh = unit_quad(0).with_uv_channel(0, vec![uv(0.0, 0.0), uv(0.5, 0.0), uv(0.0, 0.25), uv(0.5, 0.25)]);
    let scene = scene(vec![mesh], &["stone"]);
    let options = defaults().with_mode(ExportMode::Unwrapped);
    let context = {
        let mut context = ConversionContext::fill(&scene, &ImportTransform::identity(), &options).unwrap();
        o3d_convert::convert::remap::remap_surfaces(&mut context, ExportMode::Unwrapped).unwrap();
        context
    };
    let sector = convert_scene(&scene, &ImportTransform::identity(), &options).unwrap();

    assert_eq!(sector.vertices.len(), 4);
    for (index, triangle) in context.triangles.iter().enumerate() {
        let corners = sector.polygon_vertex_indices(index).unwrap();
        for (corner, t) in corners.iter().zip(triangle.tex_vertices[0].unwrap()) {
            let uv = context.tex_vertices[0][t];
            assert_eq!(
                sector.vertices[*corner].pos,
                Point3::new(uv.x as Real, -(uv.y as Real), 0.0)
            );
        }
    }
    assert_mappings_reproduce_uvs(&sector, &context, 0);
}

#[test]
fn unwrapped_mode_without_uvs_fails_early() {
    let mesh = SceneMesh::new(
        vec![v3(0.0, 0.0, 0.0), v3(1.0, 0.0, 0.0), v3(0.0, 1.0, 0.0)],
        vec![[0, 1, 2]],
        0,
    );
    let scene = scene(vec![mesh], &["stone"]);

    let unwrapped = defaults().with_mode(ExportMode::Unwrapped);
    assert!(matches!(
        convert_scene(&scene, &ImportTransform::identity(), &unwrapped),
        Err(ConversionError::NoUvData)
    ));
    assert!(matches!(
        convert_scene(&scene, &ImportTransform::identity(), &defaults()),
        Err(ConversionError::MissingPrimaryUv)
    ));
}

#[test]
fn empty_scene_is_rejected() {
    assert!(matches!(
        convert_scene(&Scene::default(), &ImportTransform::identity(), &defaults()),
        Err(ConversionError::MissingPrimaryUv)
    ));
}

#[test]
fn name_length_counts_bytes() {
    let scene = scene(vec![unit_quad(0), unit_quad(1)], &["é", "e"]);
    let context = ConversionContext::fill(&scene, &ImportTransform::identity(), &defaults()).unwrap();
    assert_eq!(context.materials[0].name, "é");
    assert_eq!(context.materials[1].name, "Default");
}

#[test]
fn nan_position_is_rejected() {
    let mut quad = unit_quad(0);
    quad.positions[3].x = f32::NAN;
    assert!(matches!(
        convert_scene(&scene(vec![quad], &["slate"]), &ImportTransform::identity(), &defaults()),
        Err(ConversionError::InvalidScene { mesh: 0, .. })
    ));
}

#[test]
fn transform_overflow_is_rejected() {
    let big = triangle_soup(
        &[[v3(0.0, 0.0, 0.0), v3(3.0e38, 0.0, 0.0), v3(0.0, 3.0e38, 0.0)]],
        &[[uv(0.0, 0.0), uv(1.0, 0.0), uv(0.0, 1.0)]],
        0,
    );
    let scene = scene(vec![unit_quad(0), big], &["slate"]);
    let result = convert_scene(&scene, &ImportTransform::scaling(2.0, 2.0, 2.0), &defaults());
    assert!(matches!(result, Err(ConversionError::InvalidScene { mesh: 1, .. })));

    // the same corners convert without the scale
    assert!(convert_scene(&scene, &ImportTransform::identity(), &defaults()).is_ok());
}
