use cpu_probe::cpu::Cpu;
use cpu_probe::driver::Driver;
use cpu_probe::lines::mpsse::Mpsse;

fn main() {
    let lines = Mpsse::open("Dual RS232-HS A", 100_000);
    let mut cpu = Cpu::new(Driver::new(Box::new(lines)));

    // Two literals, an add, then sleep
    let program = [b'2', b'3', b'+', b'z'];
    cpu.load_program(&program, 0).expect("load");

    cpu.set_pc(0);
    cpu.drv.single_step().expect("step");
    println!("pc: {}", cpu.read_pc());
    println!("stack top: {}", cpu.read_stack_top());

    // Restart from the top and hand off to a free-running clock
    cpu.set_pc(0);
    cpu.drv.execute(false).expect("start");
}
