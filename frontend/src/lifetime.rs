use std::{cell::Cell, rc::Rc};

/// Alive until the owning component unmounts.
///
/// Requests cannot be cancelled once sent, so every async completion checks
/// [`Lifetime::is_alive`] before touching component state.
#[derive(Debug, Clone)]
pub struct Lifetime(Rc<Cell<bool>>);

impl Default for Lifetime {
    fn default() -> Self {
        Self(Rc::new(Cell::new(true)))
    }
}

impl Lifetime {
    pub fn end(&self) {
        self.0.set(false);
    }

    pub fn is_alive(&self) -> bool {
        self.0.get()
    }

    /// Runs `f` only while alive. Returns whether it ran.
    pub fn run<F: FnOnce()>(&self, f: F) -> bool {
        if self.is_alive() {
            f();
            true
        } else {
            log::debug!("dropping late response of an unmounted view");
            false
        }
    }
}

impl PartialEq for Lifetime {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let lifetime = Lifetime::default();
        let in_flight = lifetime.clone();
        assert!(in_flight.is_alive());

        lifetime.end();
        assert!(!in_flight.is_alive());

        let mut applied = false;
        assert!(!in_flight.run(|| applied = true));
        assert!(!applied);
    }

    #[test]
    fn runs_while_alive() {
        let lifetime = Lifetime::default();
        let mut applied = 0;
        assert!(lifetime.run(|| applied += 1));
        assert_eq!(applied, 1);
        assert_eq!(lifetime, lifetime.clone());
        assert_ne!(lifetime, Lifetime::default());
    }
}
