mod home;
pub use home::Home;

mod login;
pub use login::Login;

mod painel;
pub use painel::Painel;

mod page;
pub use page::Page;
