/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let sites = ["CCAFS LC-40", "CCAFS SLC-40", "KSC LC-39A", "VAFB SLC-4E"];

    // (booster category, launches, mean payload kg, payload spread, success rate)
    let boosters: [(&str, usize, f64, f64, f64); 5] = [
        ("v1.0", 5, 1200.0, 700.0, 0.40),
        ("v1.1", 10, 2800.0, 1400.0, 0.55),
        ("FT", 20, 4800.0, 2100.0, 0.75),
        ("B4", 10, 5500.0, 2400.0, 0.80),
        ("B5", 11, 6000.0, 2700.0, 0.90),
    ];

    let output_path = "spacex_launch_dash.csv";
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create output file");
    writer
        .write_record([
            "Flight Number",
            "Launch Site",
            "class",
            "Payload Mass (kg)",
            "Booster Version Category",
        ])
        .expect("Failed to write header");

    let mut flight_number = 0u32;
    for &(category, launches, mean_payload, payload_spread, success_rate) in &boosters {
        for _ in 0..launches {
            flight_number += 1;
            let site = sites[(rng.next_u64() % sites.len() as u64) as usize];
            let payload_kg = rng.gauss(mean_payload, payload_spread).max(0.0);
            let class = u8::from(rng.next_f64() < success_rate);

            writer
                .write_record([
                    flight_number.to_string(),
                    site.to_string(),
                    class.to_string(),
                    format!("{payload_kg:.2}"),
                    category.to_string(),
                ])
                .expect("Failed to write record");
        }
    }

    writer.flush().expect("Failed to flush CSV");
    println!("Wrote {flight_number} launch records to {output_path}");
}
