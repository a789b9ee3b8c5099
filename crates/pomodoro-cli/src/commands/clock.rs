use pomodoro_core::clock::wall_clock_now;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", wall_clock_now());
    Ok(())
}
