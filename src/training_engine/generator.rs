use rand::{rngs::StdRng, SeedableRng};
use tracing::debug;

use crate::error::TutorError;
use crate::training_engine::{
    charts::Catalogue,
    drill::Drill,
    drills,
    models::DrillKind,
};

/// Seeded rng when a seed is given, entropy otherwise.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None       => StdRng::from_entropy(),
    }
}

/// Core dispatch: builds the drill for `kind`. `focus` narrows chart-backed
/// drills to one position, range or spot and is ignored by the others.
pub fn build_drill(kind: DrillKind, focus: Option<&str>) -> Result<Box<dyn Drill + Send>, TutorError> {
    debug!(?kind, ?focus, "building drill");
    let drill: Box<dyn Drill + Send> = match kind {
        DrillKind::HandVsHand =>
            Box::new(drills::HandVsHandDrill::new()),

        DrillKind::OpenFold =>
            Box::new(drills::OpenFoldDrill::new(&Catalogue::standard()?, focus)?),

        DrillKind::RangeMembership =>
            Box::new(drills::RangeMembershipDrill::new(&Catalogue::standard()?, focus)?),

        DrillKind::EquityBucket =>
            Box::new(drills::EquityBucketDrill::new()),

        DrillKind::PositionOrder =>
            Box::new(drills::PositionOrderDrill::new()),

        DrillKind::PreflopScenario =>
            Box::new(drills::PreflopScenarioDrill::new(&Catalogue::standard()?, focus)?),

        DrillKind::BoardTexture =>
            Box::new(drills::BoardTextureDrill::new()),

        DrillKind::RangeBuilder =>
            Box::new(drills::RangeBuilderDrill::new(&Catalogue::standard()?, focus)?),
    };
    Ok(drill)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training_engine::drill::SessionState;

    #[test]
    fn every_kind_builds_and_tags_its_questions() {
        for kind in DrillKind::ALL {
            let drill = build_drill(kind, None).unwrap();
            assert_eq!(drill.kind(), kind);
            let q = drill.generate(&SessionState::default(), &mut seeded_rng(Some(1)));
            assert_eq!(q.kind, kind);
            assert!(q.id.starts_with(&format!("{}-", kind.prefix())), "{}", q.id);
            assert!(!q.category.is_empty());
        }
    }

    #[test]
    fn focus_errors_surface() {
        assert!(build_drill(DrillKind::PreflopScenario, Some("nowhere")).is_err());
        assert!(build_drill(DrillKind::HandVsHand, Some("nowhere")).is_ok());
    }

    #[test]
    fn same_seed_same_draws() {
        use rand::RngCore;
        assert_eq!(seeded_rng(Some(42)).next_u64(), seeded_rng(Some(42)).next_u64());
    }
}
