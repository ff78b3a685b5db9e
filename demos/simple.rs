use madgwick_ahrs::{Madgwick, MadgwickSettings};

const SAMPLE_FREQUENCY: f32 = 100.0; // Hz

fn main() {
    let mut filter = Madgwick::with_settings(MadgwickSettings {
        sample_frequency: SAMPLE_FREQUENCY,
        beta: 0.1,
        ..Default::default()
    });

    for _ in 0..10 {
        // this loop should repeat each time new gyroscope data is available
        let (gx, gy, gz) = (0.0, 0.0, 0.0); // replace this with actual gyroscope data in rad/s
        let (ax, ay, az) = (0.0, 0.0, 1.0); // replace this with actual accelerometer data
        let (mx, my, mz) = (0.3, 0.0, -0.5); // replace this with actual magnetometer data, or zeros

        filter.update9(gx, gy, gz, ax, ay, az, mx, my, mz);

        let angles = filter.angles_deg();

        println!(
            "Yaw: {:.2}, Pitch: {:.2}, Roll: {:.2} (magnetometer used: {})",
            angles.yaw,
            angles.pitch,
            angles.roll,
            filter.magnetometer_used()
        );
    }
}
