use drillkit_core::{tour_length, DistanceMatrix, Point, Tour, TourClosure};

#[test]
fn test_point_from_tuple() {
    let p: Point = (2.5, -1.0).into();
    assert_eq!(p.x(), 2.5);
    assert_eq!(p.y(), -1.0);
    assert_eq!(p.to_string(), "(2.500, -1.000)");
}

#[test]
fn test_collinear_length_in_coordinate_order() {
    let points = vec![
        Point::new(0.0, 0.0),
        Point::new(5.0, 0.0),
        Point::new(10.0, 0.0),
    ];
    assert_eq!(tour_length(&points, &[0, 1, 2], TourClosure::Open), 10.0);
    assert_eq!(tour_length(&points, &[0, 2, 1], TourClosure::Open), 15.0);
    assert_eq!(tour_length(&points, &[0, 1, 2], TourClosure::Closed), 20.0);
}

#[test]
fn test_matrix_length_agrees_with_points() {
    let points = vec![
        Point::new(1.0, 1.0),
        Point::new(4.0, 5.0),
        Point::new(-2.0, 3.0),
        Point::new(0.0, -7.0),
    ];
    let tour = Tour::new(vec![3, 0, 2, 1], points.len()).unwrap();
    let matrix = DistanceMatrix::from_points(&points);

    for closure in [TourClosure::Open, TourClosure::Closed] {
        let direct = tour.length(&points, closure);
        let via_matrix = drillkit_core::length_with(&matrix, tour.as_slice(), closure);
        assert!((direct - via_matrix).abs() < 1e-12);
    }
}
