use geo::{Geometry, Line, polygon};
use geomdb::{
    BoundingBox2D, BoundingBox3D, Config, GeomDbError, GeometryIndexBuilder, MemorySource,
};
use tempfile::TempDir;

fn square(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Geometry<f64> {
    polygon![
        (x: min_x, y: min_y),
        (x: max_x, y: min_y),
        (x: max_x, y: max_y),
        (x: min_x, y: max_y),
    ]
    .into()
}

#[test]
fn test_empty_source() {
    let index = GeometryIndexBuilder::new(MemorySource::new(Vec::new()))
        .build_planar()
        .unwrap();

    assert!(index.is_empty());
    let query = BoundingBox2D::new(0.0, 0.0, 100.0, 100.0);
    assert!(index.intersecting_ids(&query).unwrap().is_empty());
    assert!(index.contains_point(0.0, 0.0).unwrap().is_empty());
}

#[test]
fn test_large_dataset_query_stays_exact() {
    // 10k reaches; a localized query must return exactly the overlapping
    // ones.
    let mut geometries = Vec::with_capacity(10_000);
    for i in 0..10_000 {
        let x = (i % 100) as f64 * 10.0;
        let y = (i / 100) as f64 * 10.0;
        geometries.push(square(x, y, x + 8.0, y + 8.0));
    }

    let index = GeometryIndexBuilder::new(MemorySource::new(geometries))
        .build_planar()
        .unwrap();
    assert_eq!(index.len(), 10_000);

    // Covers exactly cells (0,0), (1,0), (0,1), (1,1).
    let query = BoundingBox2D::new(0.0, 0.0, 12.0, 12.0);
    let mut hits = index.intersecting_ids(&query).unwrap();
    hits.sort_unstable();
    assert_eq!(hits, vec![0, 1, 100, 101]);
}

#[test]
fn test_malformed_query_boxes_fail_fast() {
    let index = GeometryIndexBuilder::new(MemorySource::new(vec![square(0.0, 0.0, 1.0, 1.0)]))
        .build_planar()
        .unwrap();

    let swapped_x = BoundingBox2D::new(5.0, 0.0, 0.0, 5.0);
    assert!(matches!(
        index.intersecting_ids(&swapped_x),
        Err(GeomDbError::InvalidQuery(_))
    ));

    let infinite = BoundingBox2D::new(0.0, 0.0, f64::INFINITY, 1.0);
    assert!(matches!(
        index.intersecting_ids(&infinite),
        Err(GeomDbError::InvalidQuery(_))
    ));

    let source = MemorySource::new(vec![square(0.0, 0.0, 1.0, 1.0)])
        .with_attribute("time", vec![0.0])
        .unwrap();
    let spacetime = GeometryIndexBuilder::new(source).build_spacetime().unwrap();
    let swapped_t = BoundingBox3D::new(0.0, 0.0, 10.0, 1.0, 1.0, -10.0);
    assert!(matches!(
        spacetime.intersecting_ids_with_time(&swapped_t),
        Err(GeomDbError::InvalidQuery(_))
    ));
}

#[test]
fn test_degenerate_query_box_is_valid() {
    let index = GeometryIndexBuilder::new(MemorySource::new(vec![square(0.0, 0.0, 10.0, 10.0)]))
        .build_planar()
        .unwrap();

    let point_box = BoundingBox2D::new(5.0, 5.0, 5.0, 5.0);
    assert_eq!(index.intersecting_ids(&point_box).unwrap(), vec![0]);
}

#[test]
fn test_query_touching_boundary_counts() {
    let index = GeometryIndexBuilder::new(MemorySource::new(vec![square(0.0, 0.0, 10.0, 10.0)]))
        .build_planar()
        .unwrap();

    // Shares only the x = 10 edge with the polygon.
    let touching = BoundingBox2D::new(10.0, 0.0, 20.0, 10.0);
    assert_eq!(index.intersecting_ids(&touching).unwrap(), vec![0]);
}

#[test]
fn test_point_on_shared_boundary_returns_both() {
    let index = GeometryIndexBuilder::new(MemorySource::new(vec![
        square(0.0, 0.0, 10.0, 10.0),
        square(10.0, 0.0, 20.0, 10.0),
    ]))
    .build_planar()
    .unwrap();

    let mut hits = index.contains_point(10.0, 5.0).unwrap();
    hits.sort_unstable();
    assert_eq!(hits, vec![0, 1]);
}

#[test]
fn test_line_geometries_refine_correctly() {
    // River reaches as polylines: bbox overlap alone would claim all three.
    let reaches: Vec<Geometry<f64>> = vec![
        Line::new(geo::coord! { x: 0.0, y: 0.0 }, geo::coord! { x: 100.0, y: 100.0 }).into(),
        Line::new(geo::coord! { x: 0.0, y: 100.0 }, geo::coord! { x: 100.0, y: 0.0 }).into(),
        Line::new(geo::coord! { x: 0.0, y: 50.0 }, geo::coord! { x: 100.0, y: 50.0 }).into(),
    ];
    let index = GeometryIndexBuilder::new(MemorySource::new(reaches))
        .build_planar()
        .unwrap();

    // Bottom-left corner: only the first diagonal passes through.
    let corner = BoundingBox2D::new(0.0, 0.0, 10.0, 10.0);
    assert_eq!(index.intersecting_ids(&corner).unwrap(), vec![0]);

    // Center: all three cross.
    let center = BoundingBox2D::new(45.0, 45.0, 55.0, 55.0);
    let mut hits = index.intersecting_ids(&center).unwrap();
    hits.sort_unstable();
    assert_eq!(hits, vec![0, 1, 2]);
}

#[test]
fn test_large_time_widening_precision_limit() {
    // The all-time widening is a finite box, not "unbounded": a record
    // whose time attribute exceeds large_time is invisible to spatial-only
    // queries. This pins the documented approximation.
    let make_source = || {
        MemorySource::new(vec![square(0.0, 0.0, 10.0, 10.0)])
            .with_attribute("time", vec![1e17])
            .unwrap()
    };
    let query = BoundingBox2D::new(0.0, 0.0, 10.0, 10.0);

    let default_widening = GeometryIndexBuilder::new(make_source())
        .build_spacetime()
        .unwrap();
    assert!(default_widening.intersecting_ids(&query).unwrap().is_empty());

    // A large enough horizon recovers the record.
    let wide = GeometryIndexBuilder::new(make_source())
        .config(Config::default().with_large_time(1e18))
        .build_spacetime()
        .unwrap();
    assert_eq!(wide.intersecting_ids(&query).unwrap(), vec![0]);
}

#[test]
fn test_stale_index_surfaces_source_desync() {
    // Build and persist over two records, then reload against a source
    // that has lost one: candidates referencing the missing record must
    // error, not vanish silently.
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("reaches");

    let full = MemorySource::new(vec![
        square(0.0, 0.0, 10.0, 10.0),
        square(20.0, 20.0, 30.0, 30.0),
    ]);
    let _ = GeometryIndexBuilder::new(full)
        .storage_root(&root)
        .build_planar()
        .unwrap();

    let truncated = MemorySource::new(vec![square(0.0, 0.0, 10.0, 10.0)]);
    let stale = GeometryIndexBuilder::new(truncated)
        .storage_root(&root)
        .build_planar()
        .unwrap();

    // The surviving record still answers.
    let first = BoundingBox2D::new(0.0, 0.0, 10.0, 10.0);
    assert_eq!(stale.intersecting_ids(&first).unwrap(), vec![0]);

    // A candidate hit on the vanished record propagates the source error.
    let second = BoundingBox2D::new(20.0, 20.0, 30.0, 30.0);
    assert!(matches!(
        stale.intersecting_ids(&second),
        Err(GeomDbError::MissingRecord(1))
    ));
}

#[test]
fn test_extreme_coordinates() {
    let index = GeometryIndexBuilder::new(MemorySource::new(vec![
        square(-180.0, -90.0, -170.0, -80.0),
        square(170.0, 80.0, 180.0, 90.0),
    ]))
    .build_planar()
    .unwrap();

    assert_eq!(
        index
            .intersecting_ids(&BoundingBox2D::new(-180.0, -90.0, -175.0, -85.0))
            .unwrap(),
        vec![0]
    );
    assert_eq!(index.contains_point(175.0, 85.0).unwrap(), vec![1]);
}

#[test]
fn test_concurrent_readers() {
    // Nothing is mutated after construction, so shared references can be
    // queried from multiple threads without synchronization.
    let mut geometries = Vec::new();
    for i in 0..100 {
        let x = (i % 10) as f64 * 10.0;
        let y = (i / 10) as f64 * 10.0;
        geometries.push(square(x, y, x + 8.0, y + 8.0));
    }
    let index = GeometryIndexBuilder::new(MemorySource::new(geometries))
        .build_planar()
        .unwrap();

    std::thread::scope(|scope| {
        for worker in 0..4 {
            let index = &index;
            scope.spawn(move || {
                for i in 0..25 {
                    let offset = (worker * 25 + i) as f64;
                    let query = BoundingBox2D::new(offset, offset, offset + 5.0, offset + 5.0);
                    let _ = index.intersecting_ids(&query).expect("query failed");
                }
            });
        }
    });
}
