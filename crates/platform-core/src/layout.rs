//! Enumerated display layout.

use serde::{Deserialize, Serialize};

use crate::{default_display_name, virtual_desktop_bounds, Display, ScreenRect};

/// Ordered set of displays plus the virtual screen that covers them.
///
/// Never empty. After construction exactly one display is primary and it
/// sits at index 0; the rest follow ordered by `(left, top)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayLayout {
    displays: Vec<Display>,
    virtual_screen: ScreenRect,
    /// Built from a fallback rect because enumeration produced nothing usable.
    synthetic: bool,
}

impl DisplayLayout {
    /// Build a layout from platform-reported displays.
    ///
    /// Displays with zero area are dropped. If none is flagged primary the
    /// first one enumerated becomes primary; if several are, only the first
    /// keeps the flag. `reported` is the platform's own virtual-screen rect
    /// and wins over the computed bounding box when present and non-empty.
    /// An empty list produces a synthetic fallback layout.
    pub fn from_platform(displays: Vec<Display>, reported: Option<ScreenRect>) -> Self {
        let mut displays: Vec<Display> = displays
            .into_iter()
            .filter(|d| d.width > 0 && d.height > 0)
            .collect();

        if displays.is_empty() {
            return match reported.filter(|r| !r.is_empty()) {
                Some(rect) => Self::synthetic_covering(rect),
                None => Self::default(),
            };
        }

        let primary_index = displays.iter().position(|d| d.primary).unwrap_or(0);
        for (index, display) in displays.iter_mut().enumerate() {
            display.primary = index == primary_index;
        }

        displays.sort_by_key(|d| (!d.primary, d.left, d.top));

        let virtual_screen = reported
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| virtual_desktop_bounds(&displays));

        Self {
            displays,
            virtual_screen,
            synthetic: false,
        }
    }

    /// Single primary display at the origin.
    pub fn synthetic(width: u32, height: u32) -> Self {
        Self::synthetic_covering(ScreenRect::new(0, 0, width, height))
    }

    /// Single primary display covering `rect`.
    pub fn synthetic_covering(rect: ScreenRect) -> Self {
        let rect = ScreenRect::new(rect.left, rect.top, rect.width.max(1), rect.height.max(1));
        Self {
            displays: vec![Display::new(0, default_display_name(0, true), rect, true)],
            virtual_screen: rect,
            synthetic: true,
        }
    }

    pub fn displays(&self) -> &[Display] {
        &self.displays
    }

    pub fn len(&self) -> usize {
        self.displays.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.displays.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Display> {
        self.displays.get(index)
    }

    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    /// The virtual screen: platform-reported when available, otherwise the
    /// bounding box of all displays.
    pub fn virtual_screen(&self) -> ScreenRect {
        self.virtual_screen
    }

    /// Bounding box of the displays, regardless of what the platform reported.
    pub fn bounding_box(&self) -> ScreenRect {
        virtual_desktop_bounds(&self.displays)
    }

    /// The platform rect disagrees with the display bounding box.
    pub fn has_virtual_screen_discrepancy(&self) -> bool {
        self.virtual_screen != self.bounding_box()
    }

    pub fn primary(&self) -> &Display {
        &self.displays[0]
    }

    /// First display (in layout order) whose half-open rect holds the point.
    pub fn display_at(&self, x: i32, y: i32) -> Option<&Display> {
        self.displays.iter().find(|d| d.contains(x, y))
    }

    /// Display under `point`, or the primary when the point is unknown or
    /// lies in a gap between displays.
    pub fn display_under_or_primary(&self, point: Option<(i32, i32)>) -> &Display {
        point
            .and_then(|(x, y)| self.display_at(x, y))
            .unwrap_or_else(|| self.primary())
    }
}

impl Default for DisplayLayout {
    fn default() -> Self {
        Self::synthetic(crate::FALLBACK_SCREEN_SIZE.0, crate::FALLBACK_SCREEN_SIZE.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn display(id: u32, left: i32, top: i32, width: u32, height: u32, primary: bool) -> Display {
        Display::new(
            id,
            format!("D{id}"),
            ScreenRect::new(left, top, width, height),
            primary,
        )
    }

    fn side_by_side() -> DisplayLayout {
        DisplayLayout::from_platform(
            vec![
                display(1, 0, 0, 1920, 1080, true),
                display(2, 1920, 0, 1080, 1920, false),
            ],
            None,
        )
    }

    #[test]
    fn pointer_resolves_to_display_under_it() {
        let layout = side_by_side();
        assert_eq!(layout.virtual_screen(), ScreenRect::new(0, 0, 3000, 1920));
        assert_eq!(layout.display_under_or_primary(Some((2000, 500))).id, 2);
        assert_eq!(layout.display_under_or_primary(Some((100, 100))).id, 1);
    }

    #[test]
    fn shared_edge_belongs_to_right_hand_display() {
        let layout = side_by_side();
        assert_eq!(layout.display_at(1920, 0).map(|d| d.id), Some(2));
        assert_eq!(layout.display_at(1919, 0).map(|d| d.id), Some(1));
    }

    #[test]
    fn gap_or_unknown_pointer_falls_back_to_primary() {
        let layout = side_by_side();
        // Below the landscape display, beside the portrait one.
        assert_eq!(layout.display_under_or_primary(Some((100, 1500))).id, 1);
        assert_eq!(layout.display_under_or_primary(None).id, 1);
    }

    #[test]
    fn primary_sorts_first_then_by_position() {
        let layout = DisplayLayout::from_platform(
            vec![
                display(3, 1920, 0, 1920, 1080, false),
                display(1, -1920, 0, 1920, 1080, false),
                display(2, 0, 0, 1920, 1080, true),
            ],
            None,
        );
        let ids: Vec<u32> = layout.displays().iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
        assert_eq!(layout.primary().id, 2);
    }

    #[test]
    fn first_enumerated_becomes_primary_when_none_flagged() {
        let layout = DisplayLayout::from_platform(
            vec![
                display(7, 1920, 0, 1920, 1080, false),
                display(8, 0, 0, 1920, 1080, false),
            ],
            None,
        );
        assert_eq!(layout.primary().id, 7);
        assert_eq!(layout.displays().iter().filter(|d| d.primary).count(), 1);
    }

    #[test]
    fn only_one_primary_survives() {
        let layout = DisplayLayout::from_platform(
            vec![
                display(1, 0, 0, 100, 100, true),
                display(2, 100, 0, 100, 100, true),
            ],
            None,
        );
        assert_eq!(layout.displays().iter().filter(|d| d.primary).count(), 1);
        assert_eq!(layout.primary().id, 1);
    }

    #[test]
    fn reported_virtual_screen_wins_and_is_flagged() {
        let layout = DisplayLayout::from_platform(
            vec![display(1, 0, 0, 1920, 1080, true)],
            Some(ScreenRect::new(0, 0, 2000, 1080)),
        );
        assert_eq!(layout.virtual_screen(), ScreenRect::new(0, 0, 2000, 1080));
        assert!(layout.has_virtual_screen_discrepancy());
        assert!(!side_by_side().has_virtual_screen_discrepancy());
    }

    #[test]
    fn empty_enumeration_yields_synthetic_layout() {
        let layout = DisplayLayout::from_platform(Vec::new(), None);
        assert!(layout.is_synthetic());
        assert_eq!(layout.len(), 1);
        assert_eq!(layout.virtual_screen(), ScreenRect::new(0, 0, 1920, 1080));
        assert!(layout.primary().primary);
        assert_eq!(layout.primary().name, "Display 1 (primary)");

        let zero_area = DisplayLayout::from_platform(
            vec![display(1, 0, 0, 0, 1080, true)],
            Some(ScreenRect::new(0, 0, 2560, 1440)),
        );
        assert!(zero_area.is_synthetic());
        assert_eq!(zero_area.virtual_screen(), ScreenRect::new(0, 0, 2560, 1440));
    }

    #[test]
    fn zero_area_fallback_keeps_reported_origin() {
        let reported = ScreenRect::new(-1920, 0, 3840, 1080);
        let layout =
            DisplayLayout::from_platform(vec![display(1, -1920, 0, 1920, 0, true)], Some(reported));

        assert!(layout.is_synthetic());
        assert_eq!(layout.virtual_screen(), reported);
        assert_eq!(layout.primary().rect(), reported);
        assert!(!layout.has_virtual_screen_discrepancy());
        assert_eq!(layout.display_under_or_primary(Some((-100, 10))).rect(), reported);
    }

    proptest! {
        #[test]
        fn layout_always_has_exactly_one_primary_at_index_zero(
            rects in prop::collection::vec(
                (-3000i32..3000, -3000i32..3000, 0u32..4000, 0u32..4000, any::<bool>()),
                0..6,
            )
        ) {
            let displays = rects
                .into_iter()
                .enumerate()
                .map(|(i, (l, t, w, h, p))| display(i as u32, l, t, w, h, p))
                .collect();
            let layout = DisplayLayout::from_platform(displays, None);
            prop_assert!(!layout.is_empty());
            prop_assert!(layout.primary().primary);
            prop_assert_eq!(layout.displays().iter().filter(|d| d.primary).count(), 1);

            let vs = layout.virtual_screen();
            for d in layout.displays() {
                prop_assert!(vs.intersection(&d.rect()) == Some(d.rect()));
            }
        }
    }
}
