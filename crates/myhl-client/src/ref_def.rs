// ref_def.rs -- effect and engine service interfaces provided by the host

use rand::Rng;

use myhl_common::q_shared::{DLight, Vec3};

/// Effect API surface -- the renderer-side sinks the client feeds.
/// Particle, light and beam storage is owned by the renderer; the client
/// only hands over fully-decoded effect requests.
pub trait EfxApi {
    fn run_particle_effect(&mut self, org: &Vec3, dir: &Vec3, color: i32, count: i32);
    fn particle_explosion(&mut self, org: &Vec3);
    fn particle_explosion2(&mut self, org: &Vec3, color_start: i32, color_length: i32);
    fn blob_explosion(&mut self, org: &Vec3);
    fn lava_splash(&mut self, org: &Vec3);
    fn teleport_splash(&mut self, org: &Vec3);

    /// Claim a zeroed light slot owned by the renderer. The caller fills
    /// origin/radius/color/die/decay and must not hold the borrow past the
    /// current message. Expiry and decay run on the renderer side.
    fn alloc_dlight(&mut self, key: i32) -> &mut DLight;

    /// Spawn a beam between two points, rendered with the named model.
    /// `ent` ties the beam to a tracked entity for follow-up updates.
    fn alloc_beam(&mut self, modelname: &str, ent: i32, start: &Vec3, end: &Vec3);
}

/// Engine services beyond the effect sinks: clock, positioned sound,
/// randomness.
pub trait EngineApi: EfxApi {
    /// Current client clock, in seconds.
    fn client_time(&self) -> f32;

    fn play_sound_at_location(&mut self, name: &str, volume: f32, origin: &Vec3);

    /// Uniform integer in the closed range [low, high]. Cosmetic variety
    /// only; hosts may substitute the engine's own generator.
    fn random_long(&mut self, low: i32, high: i32) -> i32 {
        rand::thread_rng().gen_range(low..=high)
    }
}
