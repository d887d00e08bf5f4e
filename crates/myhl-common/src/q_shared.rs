// q_shared.rs -- foundational types and constants shared by all modules

// ============================================================
// Basic types
// ============================================================

pub type Vec3 = [f32; 3];

pub const VEC3_ORIGIN: Vec3 = [0.0, 0.0, 0.0];

/// Lowercase alias for VEC3_ORIGIN, matching the C naming convention used
/// by effect code.
#[allow(non_upper_case_globals)]
pub const vec3_origin: Vec3 = [0.0, 0.0, 0.0];

// ============================================================
// Sound
// ============================================================

pub const VOL_NORM: f32 = 1.0;

// ============================================================
// Renderer interface types
// ============================================================

/// dlight_t -- dynamic point light owned by the renderer.
/// Color channels are in the 0-255 range. `die` is an absolute client
/// time; `decay` is radius units shed per second after spawn.
#[derive(Debug, Clone, Copy, Default)]
pub struct DLight {
    pub key: i32,
    pub origin: Vec3,
    pub radius: f32,
    pub color: Vec3,
    pub die: f32,
    pub decay: f32,
    pub minlight: f32,
}

// ============================================================
// Temp entity events
// ============================================================

/// Wire opcodes for svc_temp_entity messages. The values are fixed
/// protocol vocabulary shared with the server; 16 and 17 are the
/// extension codes for colored explosions and custom beam models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum TempEvent {
    Spike = 0,
    SuperSpike = 1,
    Gunshot = 2,
    Explosion = 3,
    TarExplosion = 4,
    Lightning1 = 5,
    Lightning2 = 6,
    WizSpike = 7,
    KnightSpike = 8,
    Lightning3 = 9,
    LavaSplash = 10,
    Teleport = 11,
    Explosion2 = 12,
    Beam = 13,
    Smoke = 14, // obsolete
    Explosion3 = 16,
    Lightning4 = 17,
}

impl TempEvent {
    /// Every point effect leads with a shared 3-coordinate origin. The
    /// beam family carries its own start/end points instead and must not
    /// consume that prefix. Keyed on the raw wire value because unknown
    /// opcodes also get the prefix.
    pub fn has_origin_prefix(value: i32) -> bool {
        !(value == TempEvent::Lightning1 as i32
            || value == TempEvent::Lightning2 as i32
            || value == TempEvent::Lightning3 as i32
            || value == TempEvent::Lightning4 as i32
            || value == TempEvent::Beam as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beam_family_skips_origin_prefix() {
        for te in [
            TempEvent::Lightning1,
            TempEvent::Lightning2,
            TempEvent::Lightning3,
            TempEvent::Lightning4,
            TempEvent::Beam,
        ] {
            assert!(!TempEvent::has_origin_prefix(te as i32));
        }
    }

    #[test]
    fn point_effects_keep_origin_prefix() {
        for te in [
            TempEvent::Spike,
            TempEvent::SuperSpike,
            TempEvent::Gunshot,
            TempEvent::Explosion,
            TempEvent::TarExplosion,
            TempEvent::WizSpike,
            TempEvent::KnightSpike,
            TempEvent::LavaSplash,
            TempEvent::Teleport,
            TempEvent::Explosion2,
            TempEvent::Explosion3,
            TempEvent::Smoke,
        ] {
            assert!(TempEvent::has_origin_prefix(te as i32));
        }
    }

    #[test]
    fn unknown_values_keep_origin_prefix() {
        assert!(TempEvent::has_origin_prefix(15));
        assert!(TempEvent::has_origin_prefix(40));
        assert!(TempEvent::has_origin_prefix(255));
    }
}
