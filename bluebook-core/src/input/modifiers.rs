//! Modifier key state

use bitflags::bitflags;

bitflags! {
    /// USB HID modifier byte
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u8 {
        const LEFT_CONTROL = 0x01;
        const LEFT_SHIFT = 0x02;
        const LEFT_ALT = 0x04;
        const LEFT_META = 0x08;
        const RIGHT_CONTROL = 0x10;
        const RIGHT_SHIFT = 0x20;
        const RIGHT_ALT = 0x40;
        const RIGHT_META = 0x80;

        const CONTROL = Self::LEFT_CONTROL.bits() | Self::RIGHT_CONTROL.bits();
        const SHIFT = Self::LEFT_SHIFT.bits() | Self::RIGHT_SHIFT.bits();
        const ALT = Self::LEFT_ALT.bits() | Self::RIGHT_ALT.bits();
        const META = Self::LEFT_META.bits() | Self::RIGHT_META.bits();
    }
}

impl Modifiers {
    /// Either control key held
    pub fn control(self) -> bool {
        self.intersects(Self::CONTROL)
    }

    /// Either shift key held
    pub fn shift(self) -> bool {
        self.intersects(Self::SHIFT)
    }

    /// Either alt key held
    pub fn alt(self) -> bool {
        self.intersects(Self::ALT)
    }

    /// Either meta (logo) key held
    pub fn meta(self) -> bool {
        self.intersects(Self::META)
    }
}

/// Modifier keys plus the caps-lock latch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModifierState {
    /// Modifiers reported with the most recent key
    pub held: Modifiers,
    /// Toggled by every caps-lock press
    pub caps_lock: bool,
}
