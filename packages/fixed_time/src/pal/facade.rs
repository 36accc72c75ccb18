use std::fmt::Debug;
#[cfg(test)]
use std::sync::Arc;
use std::time::{Duration, Instant};

#[cfg(test)]
use crate::pal::{FakePlatform, MockPlatform};
use crate::pal::{BUILD_TARGET_PLATFORM, BuildTargetPlatform, Platform};

#[derive(Clone)]
pub(crate) enum PlatformFacade {
    Real(&'static BuildTargetPlatform),

    #[cfg(test)]
    Mock(Arc<MockPlatform>),

    #[cfg(test)]
    Fake(FakePlatform),
}

impl PlatformFacade {
    pub(crate) fn real() -> Self {
        Self::from(&BUILD_TARGET_PLATFORM)
    }
}

impl Platform for PlatformFacade {
    fn now(&self) -> Instant {
        match self {
            Self::Real(p) => p.now(),
            #[cfg(test)]
            Self::Mock(p) => p.now(),
            #[cfg(test)]
            Self::Fake(p) => p.now(),
        }
    }

    fn sleep(&self, duration: Duration) {
        match self {
            Self::Real(p) => p.sleep(duration),
            #[cfg(test)]
            Self::Mock(p) => p.sleep(duration),
            #[cfg(test)]
            Self::Fake(p) => p.sleep(duration),
        }
    }

    fn spin_hint(&self) {
        match self {
            Self::Real(p) => p.spin_hint(),
            #[cfg(test)]
            Self::Mock(p) => p.spin_hint(),
            #[cfg(test)]
            Self::Fake(p) => p.spin_hint(),
        }
    }
}

impl From<&'static BuildTargetPlatform> for PlatformFacade {
    fn from(p: &'static BuildTargetPlatform) -> Self {
        Self::Real(p)
    }
}

#[cfg(test)]
impl From<MockPlatform> for PlatformFacade {
    fn from(p: MockPlatform) -> Self {
        Self::Mock(Arc::new(p))
    }
}

#[cfg(test)]
impl From<FakePlatform> for PlatformFacade {
    fn from(p: FakePlatform) -> Self {
        Self::Fake(p)
    }
}

impl Debug for PlatformFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Real(p) => p.fmt(f),
            #[cfg(test)]
            Self::Mock(p) => p.fmt(f),
            #[cfg(test)]
            Self::Fake(p) => p.fmt(f),
        }
    }
}
