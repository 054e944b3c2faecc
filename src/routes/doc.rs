use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{AuthResponse, LoginRequest, ProfileResponse, RegisterRequest, UserPublic},
        cart::{AddToCartRequest, CartItemView, CartResponse, CartView},
        categories::{CategoryListResponse, CategoryPublic},
        orders::{OrderLine, OrderListResponse, OrderPublic, OrderResponse},
        products::{
            CreateProductRequest, ProductListResponse, ProductPublic, ProductResponse,
            UpdateProductRequest,
        },
    },
    models::{Address, OrderStatus, Role},
    routes::{auth, cart, categories, health, orders, products},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::profile,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        categories::list_categories,
        cart::view_cart,
        cart::add_to_cart,
        cart::remove_from_cart,
        orders::checkout,
        orders::list_orders,
        orders::get_order
    ),
    components(
        schemas(
            Role,
            Address,
            OrderStatus,
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            ProfileResponse,
            UserPublic,
            CreateProductRequest,
            UpdateProductRequest,
            ProductPublic,
            ProductResponse,
            ProductListResponse,
            CategoryPublic,
            CategoryListResponse,
            AddToCartRequest,
            CartItemView,
            CartView,
            CartResponse,
            OrderLine,
            OrderPublic,
            OrderResponse,
            OrderListResponse
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Products", description = "Product catalog endpoints"),
        (name = "Categories", description = "Category endpoints"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Orders", description = "Order endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
