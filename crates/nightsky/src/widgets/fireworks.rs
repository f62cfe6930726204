use rand::Rng;
use rand::seq::IndexedRandom;
use std::ops::Range;

/// Burst colors as `0xRRGGBB`.
pub const PALETTE: [u32; 5] = [0xff0043, 0x14fc56, 0x1e90ff, 0xffe87f, 0xffffff];

/// Alpha of the background wash painted every frame, which leaves trails.
pub const TRAIL_ALPHA: f64 = 0.2;

const BURST_EVERY: u64 = 25;
const BURST_SIZE: usize = 30;
const GRAVITY: f64 = 0.05;
const MAX_SPEED: f64 = 3.0;
const RADIUS: Range<f64> = 1.0..4.0;
const DECAY: Range<f64> = 0.005..0.02;
/// Bursts only happen in the upper part of the canvas.
const SKY_SHARE: f64 = 0.6;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub radius: f64,
    pub color: u32,
    pub alpha: f64,
    pub decay: f64,
}

impl Particle {
    fn step(&mut self) {
        self.vy += GRAVITY;
        self.x += self.vx;
        self.y += self.vy;
        self.alpha -= self.decay;
    }
}

/// Frame-driven fireworks over a canvas of the given pixel size.
#[derive(Debug, Clone)]
pub struct ParticleBurst {
    width: f64,
    height: f64,
    frame: u64,
    particles: Vec<Particle>,
}

impl ParticleBurst {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            frame: 0,
            particles: Vec::new(),
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn step(&mut self, rng: &mut impl Rng) {
        self.frame += 1;
        if self.frame % BURST_EVERY == 0 {
            self.explode(rng);
        }
        for particle in &mut self.particles {
            particle.step();
        }
        self.particles.retain(|p| p.alpha > 0.0);
    }

    fn explode(&mut self, rng: &mut impl Rng) {
        let x = rng.random::<f64>() * self.width;
        let y = rng.random::<f64>() * self.height * SKY_SHARE;
        let color = PALETTE.choose(rng).copied().unwrap_or(0xffffff);
        for _ in 0..BURST_SIZE {
            self.particles.push(Particle {
                x,
                y,
                vx: rng.random_range(-MAX_SPEED..MAX_SPEED),
                vy: rng.random_range(-MAX_SPEED..MAX_SPEED),
                radius: rng.random_range(RADIUS),
                color,
                alpha: 1.0,
                decay: rng.random_range(DECAY),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_bursts_every_25_frames() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut burst = ParticleBurst::new(800.0, 600.0);
        for _ in 0..24 {
            burst.step(&mut rng);
        }
        assert!(burst.particles().is_empty());
        burst.step(&mut rng);
        assert_eq!(burst.particles().len(), 30);

        let first = &burst.particles()[0];
        assert!(PALETTE.contains(&first.color));
        assert!(burst.particles().iter().all(|p| p.color == first.color));
    }

    #[test]
    fn test_bursts_start_in_upper_sky() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut burst = ParticleBurst::new(400.0, 1000.0);
        for _ in 0..25 {
            burst.step(&mut rng);
        }
        // One frame of motion moves a particle by at most a few pixels.
        for p in burst.particles() {
            assert!(p.y < 600.0 + 4.0);
            assert!((0.0..=1.0).contains(&p.alpha));
            assert!(RADIUS.contains(&p.radius));
        }
    }

    #[test]
    fn test_faded_particles_are_removed() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut burst = ParticleBurst::new(200.0, 200.0);
        let spark = |alpha| Particle {
            x: 10.0,
            y: 10.0,
            vx: 0.0,
            vy: 0.0,
            radius: 2.0,
            color: PALETTE[0],
            alpha,
            decay: 0.02,
        };
        burst.particles = vec![spark(0.01), spark(0.5)];
        burst.step(&mut rng);
        assert_eq!(burst.particles().len(), 1);
        assert!((burst.particles()[0].vy - GRAVITY).abs() < 1e-12);
    }
}
