//! Geometrische Hilfsfunktionen für 2D-Kollisionserkennung und Containergrenzen.
//!
//! Dieses Modul bietet Funktionen zur Überprüfung von Überschneidungen zwischen
//! Rechtecken, zur Punkt-in-Rechteck-Prüfung und zur Grenzprüfung im Container.

use crate::model::Rectangle;
use crate::types::{EPSILON_GENERAL, Point};

/// Prüft, ob zwei Rechtecke sich mit positiver Fläche überschneiden.
///
/// Verwendet Axis-Aligned Bounding Box (AABB) Kollisionserkennung.
/// Gemeinsame Kanten oder Ecken zählen NICHT als Überschneidung.
///
/// # Parameter
/// * `a` - Erstes Rechteck
/// * `b` - Zweites Rechteck
///
/// # Rückgabewert
/// `true` wenn sich die Rechtecke überschneiden, sonst `false`
pub fn overlaps(a: &Rectangle, b: &Rectangle) -> bool {
    overlaps_with_tolerance(a, b, EPSILON_GENERAL)
}

/// Wie `overlaps`, aber mit expliziter Toleranz.
///
/// Eine Überlappung, die in einer Achse nicht größer als `tolerance` ist,
/// gilt als bloßes Berühren.
pub fn overlaps_with_tolerance(a: &Rectangle, b: &Rectangle, tolerance: f64) -> bool {
    let over_x = overlap_1d(a.left(), a.right(), b.left(), b.right());
    let over_y = overlap_1d(a.bottom(), a.top(), b.bottom(), b.top());

    over_x > tolerance && over_y > tolerance
}

/// Berechnet die Überlappung zweier Intervalle in einer Dimension.
///
/// # Parameter
/// * `a1` - Start des ersten Intervalls
/// * `a2` - Ende des ersten Intervalls
/// * `b1` - Start des zweiten Intervalls
/// * `b2` - Ende des zweiten Intervalls
///
/// # Rückgabewert
/// Länge der Überlappung, mindestens 0.0
///
/// # Beispiel
/// ```
/// use corner_pack::geometry::overlap_1d;
///
/// let overlap = overlap_1d(0.0, 5.0, 3.0, 8.0);
/// assert_eq!(overlap, 2.0);
/// ```
pub fn overlap_1d(a1: f64, a2: f64, b1: f64, b2: f64) -> f64 {
    (a2.min(b2) - a1.max(b1)).max(0.0)
}

/// Prüft, ob ein Punkt innerhalb eines Rechtecks liegt (Rand eingeschlossen).
///
/// # Parameter
/// * `rect` - Das Rechteck
/// * `point` - Der zu prüfende Punkt
pub fn contains(rect: &Rectangle, point: &Point) -> bool {
    point.x >= rect.left()
        && point.x <= rect.right()
        && point.y >= rect.bottom()
        && point.y <= rect.top()
}

/// Fläche eines Rechtecks.
#[inline]
pub fn area(rect: &Rectangle) -> f64 {
    rect.width * rect.height
}

/// Prüft, ob ein Rechteck vollständig im Container `[0,size.x] × [0,size.y]` liegt.
///
/// # Parameter
/// * `rect` - Das Rechteck
/// * `size` - Containergröße (Breite, Höhe)
/// * `tolerance` - Numerische Toleranz an den Rändern
pub fn within_bounds(rect: &Rectangle, size: &Point, tolerance: f64) -> bool {
    rect.left() >= -tolerance
        && rect.bottom() >= -tolerance
        && rect.right() <= size.x + tolerance
        && rect.top() <= size.y + tolerance
}

/// Prüft, ob ein Punkt auf oder außerhalb des Containerrands liegt.
///
/// Der Rand selbst zählt als außerhalb, damit Sonden an den Containerecken
/// als belegt gelten.
pub fn outside_container(point: &Point, size: &Point) -> bool {
    point.x <= 0.0 || point.y <= 0.0 || point.x >= size.x || point.y >= size.y
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Rectangle {
        Rectangle::new(Point::new(x, y), w, h).unwrap()
    }

    #[test]
    fn overlapping_rectangles_are_detected() {
        let a = rect(0.0, 0.0, 4.0, 4.0);
        let b = rect(2.0, 2.0, 4.0, 4.0);
        let c = rect(10.0, 10.0, 1.0, 1.0);

        assert!(overlaps(&a, &b));
        assert!(overlaps(&b, &a));
        assert!(!overlaps(&a, &c));
    }

    #[test]
    fn touching_edges_and_corners_do_not_overlap() {
        let a = rect(0.0, 0.0, 4.0, 4.0);
        let right = rect(4.0, 0.0, 2.0, 4.0);
        let above = rect(0.0, 4.0, 4.0, 1.0);
        let diagonal = rect(4.0, 4.0, 1.0, 1.0);

        assert!(!overlaps(&a, &right));
        assert!(!overlaps(&a, &above));
        assert!(!overlaps(&a, &diagonal));
    }

    #[test]
    fn float_noise_at_shared_edge_is_not_overlap() {
        let a = rect(0.0, 0.0, 0.1 + 0.2, 1.0);
        let b = rect(0.3, 0.0, 1.0, 1.0);
        assert!(!overlaps(&a, &b));
    }

    #[test]
    fn contained_rectangle_overlaps() {
        let outer = rect(0.0, 0.0, 10.0, 10.0);
        let inner = rect(2.0, 2.0, 1.0, 1.0);
        assert!(overlaps(&outer, &inner));
        assert!(overlaps(&inner, &outer));
    }

    #[test]
    fn contains_is_closed() {
        let r = rect(1.0, 1.0, 2.0, 2.0);
        assert!(contains(&r, &Point::new(1.0, 1.0)));
        assert!(contains(&r, &Point::new(3.0, 3.0)));
        assert!(contains(&r, &Point::new(2.0, 1.5)));
        assert!(!contains(&r, &Point::new(3.001, 2.0)));
        assert!(!contains(&r, &Point::new(0.999, 2.0)));
    }

    #[test]
    fn bounds_check() {
        let size = Point::new(10.0, 10.0);
        assert!(within_bounds(&rect(0.0, 0.0, 10.0, 10.0), &size, EPSILON_GENERAL));
        assert!(within_bounds(&rect(6.0, 6.0, 4.0, 4.0), &size, EPSILON_GENERAL));
        assert!(!within_bounds(&rect(7.0, 6.0, 4.0, 4.0), &size, EPSILON_GENERAL));
        assert!(!within_bounds(&rect(-1.0, 0.0, 4.0, 4.0), &size, EPSILON_GENERAL));
    }

    #[test]
    fn container_boundary_counts_as_outside() {
        let size = Point::new(10.0, 10.0);
        assert!(outside_container(&Point::new(0.0, 5.0), &size));
        assert!(outside_container(&Point::new(5.0, 10.0), &size));
        assert!(outside_container(&Point::new(-0.001, 5.0), &size));
        assert!(!outside_container(&Point::new(0.001, 0.001), &size));
    }
}
