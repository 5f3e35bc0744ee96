fn main() {
    qualimed_lib::run()
}
