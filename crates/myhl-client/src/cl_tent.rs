// cl_tent.rs -- client side temporary entities
//
// Decodes one svc_temp_entity message into a typed effect request, then
// feeds the host effect/sound subsystems. Decoding always completes before
// the first host call, so a truncated message never leaves partial effects
// behind.

use tracing::{debug, warn};

use myhl_common::common::{
    msg_begin_reading, msg_read_byte, msg_read_coord, msg_read_pos, msg_read_short,
    msg_read_string, MsgError,
};
use myhl_common::q_shared::{vec3_origin, TempEvent, Vec3, VOL_NORM};
use myhl_common::qcommon::SizeBuf;

use crate::ref_def::EngineApi;

// ============================================================
// Types
// ============================================================

/// One fully-decoded temp-entity message, one variant per wire opcode.
#[derive(Debug, Clone, PartialEq)]
pub enum TempEntity {
    Spike { pos: Vec3 },
    SuperSpike { pos: Vec3 },
    Gunshot { pos: Vec3 },
    Explosion { pos: Vec3 },
    TarExplosion { pos: Vec3 },
    Lightning1 { ent: i32, start: Vec3, end: Vec3 },
    Lightning2 { ent: i32, start: Vec3, end: Vec3 },
    WizSpike { pos: Vec3 },
    KnightSpike { pos: Vec3 },
    Lightning3 { ent: i32, start: Vec3, end: Vec3 },
    LavaSplash { pos: Vec3 },
    Teleport { pos: Vec3 },
    Explosion2 { pos: Vec3, color_start: i32, color_length: i32 },
    Beam { ent: i32, start: Vec3, end: Vec3 },
    /// Obsolete; the trailing byte is consumed to keep the cursor aligned.
    Smoke { pos: Vec3 },
    /// Explosion with an explicit light color, channels already scaled to
    /// the 0-255 range.
    Explosion3 { pos: Vec3, color: Vec3 },
    /// Beam with an explicit model name instead of a fixed one.
    Lightning4 { modelname: String, ent: i32, start: Vec3, end: Vec3 },
}

// ============================================================
// Decode
// ============================================================

/// Shared beam framing: entity index plus both endpoints.
fn parse_beam_fields(msg: &mut SizeBuf) -> Result<(i32, Vec3, Vec3), MsgError> {
    let ent = msg_read_short(msg)?;
    let start = msg_read_pos(msg)?;
    let end = msg_read_pos(msg)?;
    Ok((ent, start, end))
}

/// Decode one temp-entity message. Returns `Ok(None)` for opcodes outside
/// the protocol vocabulary -- those are ignored, not errors. Any read past
/// the declared size aborts the message with no variant produced.
pub fn cl_decode_tent(msg: &mut SizeBuf) -> Result<Option<TempEntity>, MsgError> {
    let te_type = msg_read_byte(msg)?;

    // all quake point effects begin with a position; the beam family
    // embeds its own endpoints instead
    let pos: Vec3 = if TempEvent::has_origin_prefix(te_type) {
        msg_read_pos(msg)?
    } else {
        vec3_origin
    };

    let te = match te_type {
        x if x == TempEvent::Spike as i32 => Some(TempEntity::Spike { pos }),
        x if x == TempEvent::SuperSpike as i32 => Some(TempEntity::SuperSpike { pos }),
        x if x == TempEvent::Gunshot as i32 => Some(TempEntity::Gunshot { pos }),
        x if x == TempEvent::Explosion as i32 => Some(TempEntity::Explosion { pos }),
        x if x == TempEvent::TarExplosion as i32 => Some(TempEntity::TarExplosion { pos }),

        x if x == TempEvent::Lightning1 as i32 => {
            let (ent, start, end) = parse_beam_fields(msg)?;
            Some(TempEntity::Lightning1 { ent, start, end })
        }
        x if x == TempEvent::Lightning2 as i32 => {
            let (ent, start, end) = parse_beam_fields(msg)?;
            Some(TempEntity::Lightning2 { ent, start, end })
        }
        x if x == TempEvent::Lightning3 as i32 => {
            let (ent, start, end) = parse_beam_fields(msg)?;
            Some(TempEntity::Lightning3 { ent, start, end })
        }
        x if x == TempEvent::Beam as i32 => {
            let (ent, start, end) = parse_beam_fields(msg)?;
            Some(TempEntity::Beam { ent, start, end })
        }
        x if x == TempEvent::Lightning4 as i32 => {
            // the model name precedes the usual beam framing
            let modelname = msg_read_string(msg);
            let (ent, start, end) = parse_beam_fields(msg)?;
            Some(TempEntity::Lightning4 { modelname, ent, start, end })
        }

        x if x == TempEvent::WizSpike as i32 => Some(TempEntity::WizSpike { pos }),
        x if x == TempEvent::KnightSpike as i32 => Some(TempEntity::KnightSpike { pos }),
        x if x == TempEvent::LavaSplash as i32 => Some(TempEntity::LavaSplash { pos }),
        x if x == TempEvent::Teleport as i32 => Some(TempEntity::Teleport { pos }),

        x if x == TempEvent::Explosion2 as i32 => {
            let color_start = msg_read_byte(msg)?;
            let color_length = msg_read_byte(msg)?;
            Some(TempEntity::Explosion2 { pos, color_start, color_length })
        }
        x if x == TempEvent::Explosion3 as i32 => {
            let color = [
                msg_read_coord(msg)? * 255.0,
                msg_read_coord(msg)? * 255.0,
                msg_read_coord(msg)? * 255.0,
            ];
            Some(TempEntity::Explosion3 { pos, color })
        }

        x if x == TempEvent::Smoke as i32 => {
            msg_read_byte(msg)?;
            Some(TempEntity::Smoke { pos })
        }

        _ => {
            debug!("ignoring unknown temp entity type {}", te_type);
            None
        }
    };
    Ok(te)
}

// ============================================================
// Emission
// ============================================================

/// All explosion variants share the same light shape, differing only in
/// color: radius 350 dying over half a second at 300 units/sec.
fn explosion_dlight<H: EngineApi>(host: &mut H, pos: &Vec3, color: Vec3) {
    let die = host.client_time() + 0.5;
    let dl = host.alloc_dlight(0);
    dl.origin = *pos;
    dl.radius = 350.0;
    dl.color = color;
    dl.die = die;
    dl.decay = 300.0;
}

/// Issue the host calls for one decoded temp entity.
pub fn cl_emit_tent<H: EngineApi>(host: &mut H, te: &TempEntity) {
    match te {
        TempEntity::Spike { pos } | TempEntity::SuperSpike { pos } => {
            let count = if matches!(*te, TempEntity::Spike { .. }) { 10 } else { 20 };
            host.run_particle_effect(pos, &vec3_origin, 0, count);

            if host.random_long(0, 5) % 5 != 0 {
                host.play_sound_at_location("weapons/tink1.wav", VOL_NORM, pos);
            } else {
                let soundpath = format!("weapons/ric{}.wav", host.random_long(1, 3));
                host.play_sound_at_location(&soundpath, VOL_NORM, pos);
            }
        }

        TempEntity::Gunshot { pos } => {
            host.run_particle_effect(pos, &vec3_origin, 0, 20);
        }

        TempEntity::Explosion { pos } => {
            explosion_dlight(host, pos, [250.0, 250.0, 250.0]);
            host.play_sound_at_location("weapons/r_exp3.wav", VOL_NORM, pos);
            host.particle_explosion(pos);
        }

        TempEntity::Explosion3 { pos, color } => {
            explosion_dlight(host, pos, *color);
            host.play_sound_at_location("weapons/r_exp3.wav", VOL_NORM, pos);
        }

        TempEntity::Explosion2 { pos, color_start, color_length } => {
            explosion_dlight(host, pos, [250.0, 250.0, 250.0]);
            host.play_sound_at_location("weapons/r_exp3.wav", VOL_NORM, pos);
            host.particle_explosion2(pos, *color_start, *color_length);
        }

        TempEntity::TarExplosion { pos } => {
            host.play_sound_at_location("weapons/r_exp3.wav", VOL_NORM, pos);
            host.blob_explosion(pos);
        }

        TempEntity::Lightning1 { ent, start, end } => {
            host.alloc_beam("progs/bolt.mdl", *ent, start, end);
        }
        TempEntity::Lightning2 { ent, start, end } => {
            host.alloc_beam("progs/bolt2.mdl", *ent, start, end);
        }
        TempEntity::Lightning3 { ent, start, end } => {
            host.alloc_beam("progs/bolt3.mdl", *ent, start, end);
        }
        TempEntity::Beam { ent, start, end } => {
            host.alloc_beam("progs/beam.mdl", *ent, start, end);
        }
        TempEntity::Lightning4 { modelname, ent, start, end } => {
            host.alloc_beam(modelname, *ent, start, end);
        }

        TempEntity::WizSpike { pos } => {
            host.run_particle_effect(pos, &vec3_origin, 20, 30);
            host.play_sound_at_location("wizard/hit.wav", VOL_NORM, pos);
        }
        TempEntity::KnightSpike { pos } => {
            host.run_particle_effect(pos, &vec3_origin, 226, 20);
            host.play_sound_at_location("hknight/hit.wav", VOL_NORM, pos);
        }

        TempEntity::LavaSplash { pos } => {
            host.lava_splash(pos);
        }
        TempEntity::Teleport { pos } => {
            host.teleport_splash(pos);
        }

        TempEntity::Smoke { .. } => {}
    }
}

// ============================================================
// Dispatch
// ============================================================

/// Parse and run one temp-entity message from an open read cursor.
pub fn cl_parse_tent<H: EngineApi>(host: &mut H, msg: &mut SizeBuf) -> Result<(), MsgError> {
    match cl_decode_tent(msg) {
        Ok(Some(te)) => {
            cl_emit_tent(host, &te);
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(e) => {
            warn!("bad temp entity message: {}", e);
            Err(e)
        }
    }
}

/// Host callback entry for one svc_temp_entity delivery. Scopes a read
/// cursor over the payload and runs a single dispatch; the buffer is not
/// retained past the call.
pub fn cl_parse_tent_message<H: EngineApi>(host: &mut H, buf: &[u8]) -> Result<(), MsgError> {
    let mut msg = SizeBuf::from_message(buf);
    msg_begin_reading(&mut msg);
    cl_parse_tent(host, &mut msg)
}
