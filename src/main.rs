fn main() {
    sandboxctl::run_cli();
}
