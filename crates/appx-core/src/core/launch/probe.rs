use tracing::debug;

use crate::config::ViewModifier;
use crate::effects::ModifierProbe;

/// Samples the qualifier mask once; an unreachable input source reads as
/// "not held".
pub fn is_view_modifier_held(probe: &dyn ModifierProbe, modifier: ViewModifier) -> bool {
    match probe.qualifiers() {
        Some(mask) => {
            let held = mask.intersects(modifier.mask());
            debug!(mask = mask.bits(), %modifier, held, "qualifiers sampled");
            held
        }
        None => {
            debug!("qualifier source unreachable");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::Qualifiers;

    struct Fixed(Option<Qualifiers>);

    impl ModifierProbe for Fixed {
        fn qualifiers(&self) -> Option<Qualifiers> {
            self.0
        }
    }

    #[test]
    fn right_shift_is_the_default_modifier() {
        let modifier = ViewModifier::default();
        assert!(is_view_modifier_held(&Fixed(Some(Qualifiers::RSHIFT)), modifier));
        assert!(!is_view_modifier_held(&Fixed(Some(Qualifiers::LSHIFT)), modifier));
        assert!(is_view_modifier_held(
            &Fixed(Some(Qualifiers::RSHIFT | Qualifiers::CAPSLOCK)),
            modifier
        ));
    }

    #[test]
    fn shift_accepts_either_side() {
        for mask in [Qualifiers::LSHIFT, Qualifiers::RSHIFT] {
            assert!(is_view_modifier_held(&Fixed(Some(mask)), ViewModifier::Shift));
        }
        assert!(!is_view_modifier_held(
            &Fixed(Some(Qualifiers::CONTROL)),
            ViewModifier::Shift
        ));
    }

    #[test]
    fn unreachable_input_is_not_held() {
        assert!(!is_view_modifier_held(&Fixed(None), ViewModifier::RShift));
        assert!(!is_view_modifier_held(
            &Fixed(Some(Qualifiers::empty())),
            ViewModifier::RShift
        ));
    }
}
