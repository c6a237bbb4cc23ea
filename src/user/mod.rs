// 用户服务
// 查询走读穿透缓存，写入先落库再失效缓存

pub mod service;

pub use service::UserService;
