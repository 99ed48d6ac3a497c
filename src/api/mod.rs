pub mod artworks;
pub mod describe;
pub mod env;
pub mod generate;
pub mod proxy;
pub mod rasterize;

pub use artworks::{
    handle_artwork_png, handle_get_artwork, handle_list_artworks, handle_save_artwork, PngQuery,
    __path_handle_artwork_png, __path_handle_get_artwork, __path_handle_list_artworks,
    __path_handle_save_artwork,
};
pub use describe::{handle_describe, DescribeRequest, __path_handle_describe};
pub use env::{handle_check_env, CheckEnvResponse, __path_handle_check_env};
pub use generate::{
    handle_generate_images, handle_prediction, GenerateRequest, GenerateResponse,
    PredictionResponse, __path_handle_generate_images, __path_handle_prediction,
};
pub use proxy::{handle_proxy_image, ProxyQuery, __path_handle_proxy_image};
pub use rasterize::{handle_rasterize, RasterizeRequest, RasterizeResponse, __path_handle_rasterize};
