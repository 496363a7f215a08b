use armory_backend::server::AppConfig;
use ortho_config::OrthoConfig;

fn main() {
    let c = AppConfig::load_from_iter([std::ffi::OsString::from("armory-backend")]).unwrap();
    eprintln!("raw session_cookie_secure = {:?}", c.session_cookie_secure);
    eprintln!("accessor = {}", c.session_cookie_secure());
}
