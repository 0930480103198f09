//! A value built from a source on first demand.

/// Holds a source until the first [`force_with`](Self::force_with) turns it
/// into the built value, which every later call returns.
///
/// If the build panics the value is left `Poisoned` and a later force panics
/// as well.
#[derive(Debug)]
pub(crate) enum Deferred<Source, Built> {
    Pending(Source),
    Ready(Built),
    Poisoned,
}

impl<Source, Built> Deferred<Source, Built> {
    pub(crate) const fn new(source: Source) -> Self {
        Self::Pending(source)
    }

    pub(crate) fn force_with<Build>(&mut self, build: Build) -> &mut Built
    where
        Build: FnOnce(Source) -> Built,
    {
        if let Self::Pending(_) = self {
            let Self::Pending(source) = std::mem::replace(self, Self::Poisoned) else {
                unreachable!("checked pending above")
            };
            *self = Self::Ready(build(source));
        }
        match self {
            Self::Ready(built) => built,
            Self::Pending(_) | Self::Poisoned => {
                panic!("deferred value was poisoned by a panic during its build")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_once() {
        let mut builds = 0;
        let mut deferred = Deferred::new(vec![1, 2, 3]);

        let sum = *deferred.force_with(|source| {
            builds += 1;
            source.iter().sum::<i32>()
        });
        let again = *deferred.force_with(|_| {
            builds += 1;
            0
        });

        assert_eq!((sum, again, builds), (6, 6, 1));
        assert!(matches!(deferred, Deferred::Ready(6)));
    }
}
